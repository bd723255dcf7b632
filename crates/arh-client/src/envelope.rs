// ----- standard library imports
use std::any::{Any, TypeId};
// ----- extra library imports
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
// ----- local imports
use crate::codec::{self, BodyCodec};
use crate::error::{DeserializationError, MaterializeError};

// ----- end imports

/// A value read through a fallback type.
pub struct FallbackModel {
    target: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl FallbackModel {
    pub(crate) fn new<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            target: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Name of the fallback type that succeeded.
    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub fn downcast<T: 'static>(self) -> std::result::Result<T, Self> {
        let target = self.target;
        self.value
            .downcast()
            .map(|boxed| *boxed)
            .map_err(|value| Self { target, value })
    }
}

impl std::fmt::Debug for FallbackModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackModel")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Everything observed about one exchange.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub status: StatusCode,
    /// serialized request body, when the body was produced from a model
    pub request_text: Option<String>,
    pub response_text: String,
    pub error: Option<MaterializeError>,
    pub fallback: Option<FallbackModel>,
}

/// Anything that exposes [`Diagnostics`] for the materializer to fill in.
pub trait DiagnosticsCarrier {
    fn diagnostics(&self) -> &Diagnostics;
    fn diagnostics_mut(&mut self) -> &mut Diagnostics;

    fn set_status_code(&mut self, status: StatusCode) {
        self.diagnostics_mut().status = status;
    }
    fn set_request_text(&mut self, text: Option<String>) {
        self.diagnostics_mut().request_text = text;
    }
    fn set_response_text(&mut self, text: String) {
        self.diagnostics_mut().response_text = text;
    }
    fn set_error(&mut self, error: MaterializeError) {
        self.diagnostics_mut().error = Some(error);
    }
    fn set_fallback(&mut self, model: FallbackModel) {
        self.diagnostics_mut().fallback = Some(model);
    }

    fn status_code(&self) -> StatusCode {
        self.diagnostics().status
    }
    fn request_text(&self) -> Option<&str> {
        self.diagnostics().request_text.as_deref()
    }
    fn response_text(&self) -> &str {
        &self.diagnostics().response_text
    }
    fn error(&self) -> Option<&MaterializeError> {
        self.diagnostics().error.as_ref()
    }
    fn fallback_model(&self) -> Option<&FallbackModel> {
        self.diagnostics().fallback.as_ref()
    }
    /// The fallback value, if one was read and it is a `T`.
    fn fallback<T: 'static>(&self) -> Option<&T>
    where
        Self: Sized,
    {
        self.fallback_model().and_then(FallbackModel::downcast_ref)
    }
}

/// A result shape that absorbs payload failures instead of returning them.
///
/// Implementors start from `Default` and read the response payload into
/// themselves; a failed read leaves them reset to `Default` with the error
/// recorded in their diagnostics.
pub trait ResponseEnvelope: DiagnosticsCarrier + Default {
    fn read_payload(
        &mut self,
        text: &str,
        codec: &dyn BodyCodec,
    ) -> std::result::Result<(), DeserializationError>;
}

/// Diagnostics only, the payload stays in `response_text`.
#[derive(Debug, Default)]
pub struct StringEnvelope {
    diagnostics: Diagnostics,
}

impl DiagnosticsCarrier for StringEnvelope {
    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}

impl ResponseEnvelope for StringEnvelope {
    fn read_payload(
        &mut self,
        _text: &str,
        _codec: &dyn BodyCodec,
    ) -> std::result::Result<(), DeserializationError> {
        Ok(())
    }
}

/// Diagnostics plus a payload read as `T`.
#[derive(Debug)]
pub struct Envelope<T> {
    diagnostics: Diagnostics,
    result: Option<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            diagnostics: Diagnostics::default(),
            result: None,
        }
    }
}

impl<T> Envelope<T> {
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<T> {
        self.result
    }
}

impl<T> DiagnosticsCarrier for Envelope<T> {
    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}

impl<T> ResponseEnvelope for Envelope<T>
where
    T: DeserializeOwned + 'static,
{
    fn read_payload(
        &mut self,
        text: &str,
        codec: &dyn BodyCodec,
    ) -> std::result::Result<(), DeserializationError> {
        // a String payload is the raw text, never JSON-decoded
        if TypeId::of::<T>() == TypeId::of::<String>() {
            let raw: Box<dyn Any> = Box::new(text.to_owned());
            if let Ok(raw) = raw.downcast::<T>() {
                self.result = Some(*raw);
                return Ok(());
            }
        }
        self.result = Some(codec::decode::<T>(codec, text)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NamingCodec;

    #[test]
    fn envelope_of_string_keeps_raw_text() {
        let codec = NamingCodec::default();
        let mut env = Envelope::<String>::default();
        env.read_payload("not-json", &codec).unwrap();
        assert_eq!(env.result().map(String::as_str), Some("not-json"));
    }

    #[test]
    fn envelope_of_model_decodes() {
        let codec = NamingCodec::default();
        let mut env = Envelope::<Vec<u8>>::default();
        env.read_payload("[1,2,3]", &codec).unwrap();
        assert_eq!(env.into_result(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn envelope_of_model_reports_failure() {
        let codec = NamingCodec::default();
        let mut env = Envelope::<Vec<u8>>::default();
        let err = env.read_payload("{}", &codec).unwrap_err();
        assert_eq!(err.target(), std::any::type_name::<Vec<u8>>());
        assert!(env.result().is_none());
    }

    #[test]
    fn fallback_model_downcast() {
        let model = FallbackModel::new(String::from("x"));
        assert_eq!(model.target(), std::any::type_name::<String>());
        assert!(model.downcast_ref::<u32>().is_none());
        let model = model.downcast::<u32>().unwrap_err();
        assert_eq!(model.downcast::<String>().unwrap(), "x");
    }

    #[test]
    fn diagnostics_setters() {
        let mut env = StringEnvelope::default();
        assert_eq!(env.status_code(), StatusCode::OK);
        env.set_status_code(StatusCode::NOT_FOUND);
        env.set_request_text(Some(String::from("{}")));
        env.set_response_text(String::from("gone"));
        assert_eq!(env.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(env.request_text(), Some("{}"));
        assert_eq!(env.response_text(), "gone");
        assert!(env.error().is_none());
        assert!(env.fallback::<String>().is_none());
    }
}
