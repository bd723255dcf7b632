// ----- standard library imports
// ----- extra library imports
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
// ----- local imports
use crate::codec::{self, BodyCodec};
use crate::envelope::ResponseEnvelope;
use crate::error::{MaterializeError, Result};
use crate::options::Fallback;

// ----- end imports

/// The raw outcome of one HTTP call, before materialization.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub request_text: Option<String>,
    pub response_text: String,
}

/// A result shape a verb method can produce.
///
/// `String` yields the response text untouched, [`Json`] reads an ordinary
/// model and propagates parse errors, and every [`ResponseEnvelope`] captures
/// parse errors instead of returning them.
pub trait FromResponse: Sized {
    fn from_response(exchange: Exchange, codec: &dyn BodyCodec, fallbacks: &[Fallback])
        -> Result<Self>;
}

/// An ordinary model read from the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl FromResponse for String {
    fn from_response(exchange: Exchange, _: &dyn BodyCodec, _: &[Fallback]) -> Result<Self> {
        Ok(exchange.response_text)
    }
}

impl<T> FromResponse for Json<T>
where
    T: DeserializeOwned,
{
    fn from_response(exchange: Exchange, codec: &dyn BodyCodec, _: &[Fallback]) -> Result<Self> {
        let model = codec::decode::<T>(codec, &exchange.response_text)?;
        Ok(Json(model))
    }
}

impl<E> FromResponse for E
where
    E: ResponseEnvelope,
{
    fn from_response(
        exchange: Exchange,
        codec: &dyn BodyCodec,
        fallbacks: &[Fallback],
    ) -> Result<Self> {
        Ok(materialize_envelope(exchange, codec, fallbacks))
    }
}

/// Fills a fresh envelope from an exchange. Never fails: payload errors and
/// fallback failures end up in the envelope diagnostics.
pub fn materialize_envelope<E>(exchange: Exchange, codec: &dyn BodyCodec, fallbacks: &[Fallback]) -> E
where
    E: ResponseEnvelope,
{
    let Exchange {
        status,
        request_text,
        response_text,
    } = exchange;

    let mut envelope = E::default();
    if let Err(primary) = envelope.read_payload(&response_text, codec) {
        tracing::warn!(
            "reading {} failed with status {status}: {primary}",
            primary.target()
        );
        // partial reads must not leak into the returned envelope
        envelope = E::default();
        let mut failures = Vec::new();
        for fallback in fallbacks {
            tracing::debug!("trying fallback {}", fallback.target());
            match fallback.attempt(&response_text, codec) {
                Ok(model) => {
                    envelope.set_fallback(model);
                    break;
                }
                Err(e) => failures.push(e),
            }
        }
        envelope.set_error(MaterializeError::new(
            primary,
            failures,
            !fallbacks.is_empty(),
        ));
    }
    envelope.set_status_code(status);
    envelope.set_response_text(response_text);
    envelope.set_request_text(request_text);
    envelope
}
