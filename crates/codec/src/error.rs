use thiserror::Error;

/// Raised when a [`Codec`](crate::codec::Codec) can not represent a value in its format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encode error: {reason}")]
pub struct EncodeError {
    reason: String,
}

impl EncodeError {
    pub fn new<S: ToString>(reason: S) -> Self {
        Self { reason: reason.to_string() }
    }

    /// The diagnostic text of the underlying serializer.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Raised when raw bytes are malformed for the format of a [`Codec`](crate::codec::Codec).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error: {reason}")]
pub struct DecodeError {
    reason: String,
}

impl DecodeError {
    pub fn new<S: ToString>(reason: S) -> Self {
        Self { reason: reason.to_string() }
    }

    /// The diagnostic text of the underlying parser.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Lookup of a mime type that is not part of a [`ContentTypeRegistry`](crate::ContentTypeRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no codec registered for mime type: {mime_type}")]
pub struct CodecNotFound {
    mime_type: String,
}

impl CodecNotFound {
    pub fn new<S: ToString>(mime_type: S) -> Self {
        Self { mime_type: mime_type.to_string() }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
