// ----- standard library imports
use std::borrow::Cow;
// ----- extra library imports
use encoding_rs::{Encoding, UTF_8};
use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
// ----- local imports
use crate::error::{DeserializationError, Error, Result};
use crate::options::{RequestOptions, RequestType};
use crate::rename::{Outgoing, RenameDeserializer};

// ----- end imports

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decides the wire names of model fields and turns models into request bodies.
///
/// Names are looked up per declared struct field, so map keys and enum
/// variants never pass through a codec.
pub trait BodyCodec: Send + Sync + std::fmt::Debug {
    /// Wire name written for a declared field.
    fn outgoing_name<'a>(&self, declared: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(declared)
    }

    /// Whether incoming wire names differ from the declared ones.
    fn renames_incoming(&self) -> bool {
        false
    }

    /// Wire name read back into a declared field.
    fn incoming_name<'a>(&self, declared: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(declared)
    }

    fn encode_json(&self, value: Value, options: &RequestOptions) -> Result<RequestBody> {
        json_body(&value, options)
    }

    fn encode_form(&self, _value: Value, options: &RequestOptions) -> Result<RequestBody> {
        Err(Error::UnsupportedRequestType(options.request_type))
    }

    fn encode(&self, value: Value, options: &RequestOptions) -> Result<RequestBody> {
        match options.request_type {
            RequestType::Json => self.encode_json(value, options),
            RequestType::FormUrlEncoded => self.encode_form(value, options),
        }
    }
}

/// A serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// the body before charset encoding, kept for diagnostics
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingConvention {
    /// names are left as the model declares them
    #[default]
    AsDeclared,
    PascalCase,
    CamelCase,
    SnakeCase,
}

impl NamingConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::AsDeclared => name.to_owned(),
            Self::PascalCase => name.to_upper_camel_case(),
            Self::CamelCase => name.to_lower_camel_case(),
            Self::SnakeCase => name.to_snake_case(),
        }
    }
}

/// Which way a naming convention is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverrideDirection {
    Serialization,
    Deserialization,
    #[default]
    Both,
}

impl OverrideDirection {
    pub fn serializes(self) -> bool {
        matches!(self, Self::Serialization | Self::Both)
    }

    pub fn deserializes(self) -> bool {
        matches!(self, Self::Deserialization | Self::Both)
    }
}

/// JSON/form codec writing declared field names in a wire convention.
///
/// The mapping always runs from the declared name to the wire name, so a
/// model round-trips under any convention. The default renames nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingCodec {
    wire: NamingConvention,
    direction: OverrideDirection,
}

impl NamingCodec {
    pub fn new(wire: NamingConvention, direction: OverrideDirection) -> Self {
        Self { wire, direction }
    }

    pub fn snake_case(direction: OverrideDirection) -> Self {
        Self::new(NamingConvention::SnakeCase, direction)
    }

    pub fn camel_case(direction: OverrideDirection) -> Self {
        Self::new(NamingConvention::CamelCase, direction)
    }

    pub fn pascal_case(direction: OverrideDirection) -> Self {
        Self::new(NamingConvention::PascalCase, direction)
    }
}

impl BodyCodec for NamingCodec {
    fn outgoing_name<'a>(&self, declared: &'a str) -> Cow<'a, str> {
        if self.direction.serializes() && self.wire != NamingConvention::AsDeclared {
            Cow::Owned(self.wire.apply(declared))
        } else {
            Cow::Borrowed(declared)
        }
    }

    fn renames_incoming(&self) -> bool {
        self.direction.deserializes() && self.wire != NamingConvention::AsDeclared
    }

    fn incoming_name<'a>(&self, declared: &'a str) -> Cow<'a, str> {
        if self.renames_incoming() {
            Cow::Owned(self.wire.apply(declared))
        } else {
            Cow::Borrowed(declared)
        }
    }

    fn encode_form(&self, value: Value, _options: &RequestOptions) -> Result<RequestBody> {
        Ok(form_body(&value))
    }
}

pub fn json_body(value: &Value, options: &RequestOptions) -> Result<RequestBody> {
    let text = serde_json::to_string(value).map_err(Error::Serialization)?;
    let encoding = match options.request_charset.as_deref() {
        Some(label) => resolve_charset(label)?,
        None => UTF_8,
    };
    let (bytes, used, _) = encoding.encode(&text);
    let content_type = if options.omit_content_type_charset {
        String::from(JSON_CONTENT_TYPE)
    } else {
        format!(
            "{JSON_CONTENT_TYPE}; charset={}",
            used.name().to_ascii_lowercase()
        )
    };
    Ok(RequestBody {
        content_type,
        bytes: bytes.into_owned(),
        text,
    })
}

pub fn form_body(value: &Value) -> RequestBody {
    let pairs = flatten(value);
    let text = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    RequestBody {
        content_type: String::from(FORM_CONTENT_TYPE),
        bytes: text.clone().into_bytes(),
        text,
    }
}

/// Flattens a JSON tree into key/value pairs in document order.
///
/// Keys are member paths (`owner.name`, `tags[0]`), null leaves are dropped.
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    flatten_into(value, String::new(), &mut pairs);
    pairs
}

fn flatten_into(value: &Value, path: String, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child, child_path, pairs);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                flatten_into(child, format!("{path}[{idx}]"), pairs);
            }
        }
        Value::String(text) => pairs.push((path, text.clone())),
        Value::Bool(_) | Value::Number(_) => pairs.push((path, value.to_string())),
    }
}

pub(crate) fn resolve_charset(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::UnknownCharset(label.to_owned()))
}

/// Serializes a model under the codec's field names and hands it to the codec.
pub fn encode<Q>(codec: &dyn BodyCodec, model: &Q, options: &RequestOptions) -> Result<RequestBody>
where
    Q: Serialize + ?Sized,
{
    let value = serde_json::to_value(Outgoing::new(model, codec)).map_err(Error::Serialization)?;
    codec.encode(value, options)
}

/// Reads response text into `T`, matching wire names to declared fields.
pub fn decode<T>(codec: &dyn BodyCodec, text: &str) -> std::result::Result<T, DeserializationError>
where
    T: DeserializeOwned,
{
    let malformed = |source| DeserializationError::Malformed {
        target: std::any::type_name::<T>(),
        source,
    };
    if !codec.renames_incoming() {
        return serde_json::from_str(text).map_err(malformed);
    }
    let mut de = serde_json::Deserializer::from_str(text);
    let model = T::deserialize(RenameDeserializer::new(&mut de, codec)).map_err(malformed)?;
    de.end().map_err(malformed)?;
    Ok(model)
}
