// ----- standard library imports
// ----- extra library imports
use thiserror::Error;
// ----- local imports
use crate::handler::TlsVersion;
use crate::options::RequestType;

// ----- end imports

pub type Result<T> = std::result::Result<T, Error>;
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid url {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid header name {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
    #[error("invalid header value {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
    #[error("unknown charset {0}")]
    UnknownCharset(String),
    #[error("minimum TLS version {min:?} is above maximum {max:?}")]
    InvalidTlsRange { min: TlsVersion, max: TlsVersion },
    #[error("unsupported request type {0:?}")]
    UnsupportedRequestType(RequestType),
    #[error("serialization error {0}")]
    Serialization(#[source] serde_json::Error),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error("transport error {0}")]
    Transport(#[from] reqwest::Error),
    #[error("runtime error {0}")]
    Runtime(#[source] std::io::Error),
}

/// Failure to read a response body into one target type.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("cannot read response as {target}: {source}")]
    Malformed {
        target: &'static str,
        source: serde_json::Error,
    },
    #[error("response is neither a JSON object nor a JSON array, {target} not attempted")]
    NotJson { target: &'static str },
}

impl DeserializationError {
    /// Name of the type the response was read into.
    pub fn target(&self) -> &'static str {
        match self {
            Self::Malformed { target, .. } | Self::NotJson { target } => target,
        }
    }
}

/// Captured on an envelope when its payload cannot be read.
///
/// `source()` is the failure of the primary payload type; every fallback that
/// was tried and failed is kept, in the order it was tried.
#[derive(Debug, Error)]
#[error("{}", summary(.with_fallbacks))]
pub struct MaterializeError {
    #[source]
    primary: DeserializationError,
    fallback_failures: Vec<DeserializationError>,
    with_fallbacks: bool,
}

fn summary(with_fallbacks: &bool) -> &'static str {
    if *with_fallbacks {
        "an error occurred while deserializing the data, see the source error and fallback failures for details"
    } else {
        "an error occurred while deserializing the data, see the source error for details"
    }
}

impl MaterializeError {
    pub(crate) fn new(
        primary: DeserializationError,
        fallback_failures: Vec<DeserializationError>,
        with_fallbacks: bool,
    ) -> Self {
        Self {
            primary,
            fallback_failures,
            with_fallbacks,
        }
    }

    pub fn primary(&self) -> &DeserializationError {
        &self.primary
    }

    pub fn fallback_failures(&self) -> &[DeserializationError] {
        &self.fallback_failures
    }
}
