use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Turns a raw response body into a typed value.
pub trait Decoder<T>: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// Strict JSON decoding via serde.
///
/// Unknown fields are ignored and `Option` fields may be absent, but a
/// missing or mistyped mandatory field fails the whole body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::from)
    }
}
