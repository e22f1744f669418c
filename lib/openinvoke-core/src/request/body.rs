use mime::Mime;
use serde_json::Value;

use crate::InvokerError;
use crate::catalog::RequestBodySpec;

/// Request body encodings supported by the builder, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
    /// `application/json`: the body value is serialized to JSON text.
    Json,
    /// `application/x-www-form-urlencoded`: the body value is passed as structured fields.
    FormUrlEncoded,
    /// `multipart/form-data`: the body value is passed as structured fields.
    Multipart,
}

impl BodyEncoding {
    /// Every supported encoding, highest priority first.
    pub const PRIORITY: [Self; 3] = [Self::Json, Self::FormUrlEncoded, Self::Multipart];

    /// The MIME type of this encoding, also used as `Content-Type` value.
    pub fn mime(self) -> Mime {
        match self {
            Self::Json => mime::APPLICATION_JSON,
            Self::FormUrlEncoded => mime::APPLICATION_WWW_FORM_URLENCODED,
            Self::Multipart => mime::MULTIPART_FORM_DATA,
        }
    }

    /// Picks the highest priority encoding declared by a request body.
    ///
    /// Declared content types are compared on their MIME essence, so
    /// `application/json; charset=utf-8` selects [`BodyEncoding::Json`].
    pub fn select(request_body: &RequestBodySpec) -> Option<Self> {
        let declared: Vec<Mime> = request_body
            .content_types()
            .filter_map(|content_type| content_type.parse::<Mime>().ok())
            .collect();

        Self::PRIORITY.into_iter().find(|encoding| {
            declared
                .iter()
                .any(|mime| mime.essence_str() == encoding.mime().essence_str())
        })
    }

    /// Builds the payload for a body value.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::JsonValueError`] if JSON serialization fails.
    pub fn encode(self, body: &Value) -> Result<Payload, InvokerError> {
        let payload = match self {
            Self::Json => Payload::Text(serde_json::to_string(body)?),
            Self::FormUrlEncoded | Self::Multipart => Payload::Fields(body.clone()),
        };
        Ok(payload)
    }
}

/// A request payload, as handed over to the execution layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized text, ready to send.
    Text(String),
    /// Structured fields, serialized by the execution layer (form or multipart).
    Fields(Value),
}

impl Payload {
    /// The serialized text, for [`Payload::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Fields(_) => None,
        }
    }

    /// The structured fields, for [`Payload::Fields`].
    pub fn as_fields(&self) -> Option<&Value> {
        match self {
            Self::Text(_) => None,
            Self::Fields(fields) => Some(fields),
        }
    }
}

/// The body computed for an operation: chosen encoding and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBody {
    /// The selected encoding.
    pub encoding: BodyEncoding,
    /// The payload computed for the caller's body value.
    pub payload: Payload,
}
