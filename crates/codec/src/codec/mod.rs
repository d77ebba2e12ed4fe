//! The [`Codec`] abstraction and the built-in codecs.
//!
//! A codec is a named, stateless encode/decode pair for exactly one mime type. Codecs are
//! constructed once while the [`ContentTypeRegistry`] is assembled and are shared read-only by
//! every request afterwards, which is why the trait requires `Send + Sync` and takes `&self`.
//!
//! Values travel through codecs as [`serde_json::Value`], the common in-memory shape for every
//! supported wire format.

mod json;
mod yaml;

pub use json::JsonCodec;
pub use yaml::YamlCodec;

use crate::registry::ContentTypeRegistry;
use crate::{DecodeError, EncodeError};
use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;
use std::fmt::Debug;

/// Encode/decode logic for one wire format, keyed by its mime type.
pub trait Codec: Send + Sync + Debug {
    /// The mime type this codec is registered under, e.g. `application/json`.
    fn mime_type(&self) -> &str;

    /// File extension used for download file names, without the leading dot.
    fn extension(&self) -> &str;

    /// A short human readable description, shown on discovery pages.
    fn description(&self) -> &str {
        ""
    }

    /// Encodes `value`. Must not depend on anything but `value` and `ctx`.
    fn encode(&self, value: &Value, ctx: &CodecContext<'_>) -> Result<Bytes, EncodeError>;

    /// Decodes `raw` into a value.
    fn decode(&self, raw: &[u8], ctx: &CodecContext<'_>) -> Result<Value, DecodeError>;
}

/// The request/response state a codec may look at while encoding or decoding.
///
/// Most codecs ignore it; renderers such as an HTML discovery page use it to list the other
/// registered content types or to switch to an error layout.
#[derive(Debug, Clone, Copy)]
pub struct CodecContext<'a> {
    content_types: &'a ContentTypeRegistry,
    status: StatusCode,
    reason: &'a str,
}

impl<'a> CodecContext<'a> {
    pub fn new(content_types: &'a ContentTypeRegistry, status: StatusCode, reason: &'a str) -> Self {
        Self { content_types, status, reason }
    }

    /// A context with a `200 OK` status, for use outside of a response cycle.
    pub fn detached(content_types: &'a ContentTypeRegistry) -> Self {
        Self::new(content_types, StatusCode::OK, "OK")
    }

    /// All content types available on the endpoint being served.
    pub fn content_types(&self) -> &'a ContentTypeRegistry {
        self.content_types
    }

    /// The response status at the time of encoding.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response status message at the time of encoding.
    pub fn reason(&self) -> &'a str {
        self.reason
    }

    /// Whether the response status signals an error (anything from 300 upwards).
    pub fn is_error_status(&self) -> bool {
        self.status.as_u16() >= 300
    }
}
