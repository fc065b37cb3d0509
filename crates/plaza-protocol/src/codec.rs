//! Codec trait and implementations for the text wire format.
//!
//! A codec converts between Rust types and the text frames carried by the
//! transport. The rest of the stack only sees the [`Codec`] trait, so a
//! binary codec could be swapped in later without touching the gateway.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to text frames and decodes frames back.
///
/// `Send + Sync + 'static` because the codec is shared across connection
/// tasks for the life of the server. The methods are generic over any
/// serde-capable type; `DeserializeOwned` (rather than `Deserialize<'de>`)
/// because decoded messages must outlive the incoming frame buffer.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one text frame back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed,
    /// truncated, or carries an unknown message tag.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] using JSON via `serde_json`.
///
/// Human-readable on the wire, which makes browser DevTools and log lines
/// directly inspectable — the right default for a world whose clients are
/// web pages.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
