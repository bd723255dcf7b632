// ----- standard library imports
use std::any::TypeId;
use std::time::Duration;
// ----- extra library imports
use serde::de::DeserializeOwned;
// ----- local imports
use crate::codec::{self, BodyCodec};
use crate::envelope::FallbackModel;
use crate::error::DeserializationError;

// ----- end imports

/// How an outgoing model is written to the request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestType {
    #[default]
    Json,
    FormUrlEncoded,
}

/// An alternate target type, tried when the primary payload type cannot be read.
#[derive(Clone, Copy)]
pub struct Fallback {
    target: &'static str,
    is_text: bool,
    parse: fn(&str, &dyn BodyCodec) -> Result<FallbackModel, DeserializationError>,
}

impl Fallback {
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            target: std::any::type_name::<T>(),
            is_text: TypeId::of::<T>() == TypeId::of::<String>(),
            parse: parse_fallback::<T>,
        }
    }

    /// Keeps the response text as it is.
    pub fn text() -> Self {
        Self::of::<String>()
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub(crate) fn attempt(
        &self,
        text: &str,
        codec: &dyn BodyCodec,
    ) -> Result<FallbackModel, DeserializationError> {
        if self.is_text {
            return Ok(FallbackModel::new(text.to_owned()));
        }
        if !looks_like_json(text) {
            return Err(DeserializationError::NotJson {
                target: self.target,
            });
        }
        (self.parse)(text, codec)
    }
}

impl std::fmt::Debug for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Fallback").field(&self.target).finish()
    }
}

fn parse_fallback<T>(text: &str, codec: &dyn BodyCodec) -> Result<FallbackModel, DeserializationError>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    codec::decode::<T>(codec, text).map(FallbackModel::new)
}

/// Cheap shape check, not a validation: the text opens a JSON object or array.
pub(crate) fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'{') | Some(b'['))
}

/// Caller-supplied body that the codec does not touch.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Content {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            bytes: bytes.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new("text/plain; charset=utf-8", text)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: None,
            bytes: bytes.into(),
        }
    }
}

/// Per-call settings. Read-only for the duration of the call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// appended after the handler defaults, repeated names are sent repeatedly
    pub headers: Vec<(String, Vec<String>)>,
    /// overrides the handler timeout
    pub timeout: Option<Duration>,
    /// advertise gzip and decode gzip encoded bodies
    pub use_gzip: bool,
    pub request_type: RequestType,
    pub fallbacks: Vec<Fallback>,
    /// encoding label for outgoing text, UTF-8 when missing
    pub request_charset: Option<String>,
    /// encoding label for the response when its Content-Type carries no charset
    pub response_charset: Option<String>,
    pub omit_content_type_charset: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_header_values(name, [value])
    }

    pub fn with_header_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.headers.push((name.into(), values));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_gzip(mut self) -> Self {
        self.use_gzip = true;
        self
    }

    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    pub fn with_request_charset(mut self, label: impl Into<String>) -> Self {
        self.request_charset = Some(label.into());
        self
    }

    pub fn with_response_charset(mut self, label: impl Into<String>) -> Self {
        self.response_charset = Some(label.into());
        self
    }

    pub fn omit_content_type_charset(mut self) -> Self {
        self.omit_content_type_charset = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_like_json_accepts_objects_and_arrays() {
        assert!(looks_like_json("{\"a\":1}"));
        assert!(looks_like_json("[1]"));
        assert!(looks_like_json("  \n{}"));
        assert!(!looks_like_json("not-json"));
        assert!(!looks_like_json("\"quoted\""));
        assert!(!looks_like_json(""));
    }

    #[test]
    fn fallback_text_skips_the_shape_check() {
        let codec = codec::NamingCodec::default();
        let model = Fallback::text()
            .attempt("not-json", &codec)
            .expect("text fallback");
        assert_eq!(model.downcast_ref::<String>().unwrap(), "not-json");
    }

    #[test]
    fn fallback_model_rejects_non_json_text() {
        let codec = codec::NamingCodec::default();
        let res = Fallback::of::<Vec<u32>>().attempt("oops", &codec);
        assert!(matches!(res, Err(DeserializationError::NotJson { .. })));
    }

    #[test]
    fn fallback_model_parses_json() {
        let codec = codec::NamingCodec::default();
        let model = Fallback::of::<Vec<u32>>()
            .attempt("[1, 2]", &codec)
            .expect("vec fallback");
        assert_eq!(model.downcast_ref::<Vec<u32>>().unwrap(), &vec![1, 2]);
        assert_eq!(model.target(), std::any::type_name::<Vec<u32>>());
    }

    #[test]
    fn headers_keep_insertion_order() {
        let options = RequestOptions::new()
            .with_header("x-one", "1")
            .with_header_values("x-two", ["2a", "2b"])
            .with_header("x-one", "again");
        let names: Vec<_> = options.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["x-one", "x-two", "x-one"]);
        assert_eq!(options.headers[1].1, vec!["2a", "2b"]);
    }
}
