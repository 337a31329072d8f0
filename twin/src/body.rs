//! Decoded view of a response body.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A response body, interpreted by shape.
///
/// Twins answer with JSON almost everywhere, but error pages from proxies
/// and the binary `/fetch` endpoint do not. The body is decoded into
/// whichever shape it arrived in; nothing is dropped or coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body at all.
    Empty,
    /// A JSON document.
    Json(Value),
    /// UTF-8 text that is not JSON.
    Text(String),
    /// Anything else.
    Binary(Vec<u8>),
}

impl ResponseBody {
    /// Interprets raw body bytes.
    ///
    /// Only a zero-length body is [`ResponseBody::Empty`]. Otherwise tries
    /// JSON first, then UTF-8 text, and falls back to raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return Self::Json(value);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Binary(err.into_bytes()),
        }
    }

    /// Returns the JSON document, if the body is one.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the body is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the `error` string of a `{ "error": "..." }` body.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.as_json()?.get("error")?.as_str()
    }

    /// Deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the body is not JSON or does not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Json(value) => T::deserialize(value),
            Self::Empty => serde_json::from_slice(b""),
            Self::Text(text) => serde_json::from_str(text),
            Self::Binary(bytes) => serde_json::from_slice(bytes),
        }
    }

    /// Converts the body back into bytes.
    ///
    /// A JSON body is re-serialised compactly, so its bytes may differ from
    /// those received. [`ErrorDetail::raw`](crate::ErrorDetail::raw) keeps the
    /// original.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
