// ----- standard library imports
// ----- extra library imports
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
// ----- local imports

// ----- end imports

///--------------------------- request echo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// What the echo endpoint saw of the incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EchoReply {
    pub method: String,
    pub content_type: Option<String>,
    pub body: String,
    /// in arrival order, repeated names kept
    pub headers: Vec<HeaderEntry>,
}

impl EchoReply {
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }
}

///--------------------------- canned responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawParams {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GzipParams {
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlowParams {
    pub millis: u64,
}
