//! Content type codecs and `Accept` header negotiation.
//!
//! This crate is the leaf layer of micro-rest. It knows nothing about requests or responses; it
//! only answers two questions:
//!
//! - *which representation?*: [`ContentTypeRegistry::negotiate`] matches an HTTP `Accept`
//!   header against the registered mime types, following the quality value and specificity
//!   rules of RFC 9110 (see [`accept`]);
//! - *how to get there?*: every registered [`Codec`] turns a [`serde_json::Value`] into bytes
//!   of its format and back.
//!
//! # Example
//!
//! ```
//! use micro_rest_codec::{Codec, CodecContext, ContentTypeRegistry};
//! use serde_json::json;
//!
//! let registry = ContentTypeRegistry::defaults();
//! let mime_type = registry.negotiate("application/x-yaml;q=0.8, application/json").unwrap();
//! assert_eq!(mime_type, "application/json");
//!
//! let codec = registry.get(mime_type).unwrap();
//! let ctx = CodecContext::detached(&registry);
//! let bytes = codec.encode(&json!({"hello": "world"}), &ctx).unwrap();
//! assert_eq!(codec.decode(&bytes, &ctx).unwrap(), json!({"hello": "world"}));
//! ```
//!
//! # Sharing
//!
//! Codecs and registries are immutable once built. A registry is cheap to clone (codecs are
//! reference counted) and safe to share between any number of concurrent requests.

pub mod accept;
pub mod codec;

mod error;
mod registry;

pub use codec::Codec;
pub use codec::CodecContext;
pub use codec::JsonCodec;
pub use codec::YamlCodec;
pub use error::CodecNotFound;
pub use error::DecodeError;
pub use error::EncodeError;
pub use registry::ContentTypeRegistry;
