// ----- standard library imports
// ----- extra library imports
// ----- local modules
pub mod blocking;
pub mod codec;
mod envelope;
mod error;
mod handler;
mod materialize;
mod options;
mod rename;
// ----- local imports

pub use envelope::{
    Diagnostics, DiagnosticsCarrier, Envelope, FallbackModel, ResponseEnvelope, StringEnvelope,
};
pub use error::{DeserializationError, Error, MaterializeError, Result};
pub use handler::{RestHandler, RestHandlerConfig, TlsVersion};
pub use materialize::{materialize_envelope, Exchange, FromResponse, Json};
pub use options::{Content, Fallback, RequestOptions, RequestType};
pub use reqwest::{StatusCode, Url};
