use crate::codec::{Codec, CodecContext};
use crate::{DecodeError, EncodeError};
use bytes::Bytes;
use serde_json::Value;
use tracing::trace;

const DESCRIPTION: &str = "JavaScript Object Notation, a lightweight data-interchange format with parsers \
available for most programming languages. See https://json.org/ for details.";

/// `application/json`, pretty printed with two space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub const MIME_TYPE: &'static str = "application/json";

    pub fn new() -> Self {
        Self
    }

    /// Encodes `value` without needing a [`CodecContext`].
    ///
    /// This is the registry independent encoding used for diagnostics that must be produced
    /// when no codec could be negotiated.
    pub fn to_pretty(value: &Value) -> Result<String, EncodeError> {
        serde_json::to_string_pretty(value).map_err(EncodeError::new)
    }
}

impl Codec for JsonCodec {
    fn mime_type(&self) -> &str {
        Self::MIME_TYPE
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn encode(&self, value: &Value, _ctx: &CodecContext<'_>) -> Result<Bytes, EncodeError> {
        serde_json::to_vec_pretty(value).map(Bytes::from).map_err(|e| {
            trace!("error encoding json: {}", e);
            EncodeError::new(e)
        })
    }

    fn decode(&self, raw: &[u8], _ctx: &CodecContext<'_>) -> Result<Value, DecodeError> {
        serde_json::from_slice(raw).map_err(|e| {
            trace!("error decoding json: {}", e);
            DecodeError::new(e)
        })
    }
}
