use crate::codec::{Codec, CodecContext};
use crate::{DecodeError, EncodeError};
use bytes::Bytes;
use serde_json::Value;
use tracing::trace;

const DESCRIPTION: &str = "YAML Ain't Markup Language, a lightweight and easily human-readable \
data-interchange format with parsers available for most programming languages. See https://yaml.org/ for details.";

/// YAML restricted to plain data: documents are only ever loaded into [`Value`], so tags can
/// not construct arbitrary types from untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct YamlCodec {
    mime_type: &'static str,
}

impl YamlCodec {
    pub const MIME_TYPE: &'static str = "application/x-yaml";
    pub const STANDARD_MIME_TYPE: &'static str = "application/yaml";

    /// Registers as `application/x-yaml`.
    pub fn new() -> Self {
        Self { mime_type: Self::MIME_TYPE }
    }

    /// Registers as the `application/yaml` type from RFC 9512.
    pub fn standard() -> Self {
        Self { mime_type: Self::STANDARD_MIME_TYPE }
    }
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for YamlCodec {
    fn mime_type(&self) -> &str {
        self.mime_type
    }

    fn extension(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn encode(&self, value: &Value, _ctx: &CodecContext<'_>) -> Result<Bytes, EncodeError> {
        serde_yaml::to_string(value).map(Bytes::from).map_err(|e| {
            trace!("error encoding yaml: {}", e);
            EncodeError::new(e)
        })
    }

    fn decode(&self, raw: &[u8], _ctx: &CodecContext<'_>) -> Result<Value, DecodeError> {
        // an empty document loads as null
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_yaml::from_slice(raw).map_err(|e| {
            trace!("error decoding yaml: {}", e);
            DecodeError::new(e)
        })
    }
}
