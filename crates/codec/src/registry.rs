//! The [`ContentTypeRegistry`], an insertion ordered set of codecs keyed by mime type.
//!
//! Registries are assembled once, typically by merging a base registry with extension
//! registries, and are read-only afterwards. Insertion order is significant: it is the final
//! tie-break of [`ContentTypeRegistry::negotiate`].

use crate::CodecNotFound;
use crate::accept::AcceptHeader;
use crate::codec::{Codec, JsonCodec, YamlCodec};
use std::sync::Arc;
use tracing::debug;

/// Mapping from mime type to [`Codec`]. Registering a mime type twice keeps the position of the
/// first registration and the codec of the last one.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self { codecs: vec![] }
    }

    /// JSON followed by YAML (`application/x-yaml`).
    pub fn defaults() -> Self {
        Self::new().with(JsonCodec::new()).with(YamlCodec::new())
    }

    /// Builder style [`add`](Self::add).
    #[must_use]
    pub fn with<C: Codec + 'static>(mut self, codec: C) -> Self {
        self.add(codec);
        self
    }

    pub fn add<C: Codec + 'static>(&mut self, codec: C) {
        self.add_shared(Arc::new(codec));
    }

    /// Adds a codec that is already shared, e.g. one taken from another registry.
    pub fn add_shared(&mut self, codec: Arc<dyn Codec>) {
        match self.position(codec.mime_type()) {
            Some(index) => self.codecs[index] = codec,
            None => self.codecs.push(codec),
        }
    }

    pub fn add_many<I>(&mut self, codecs: I)
    where
        I: IntoIterator<Item = Arc<dyn Codec>>,
    {
        for codec in codecs {
            self.add_shared(codec);
        }
    }

    /// The codec registered for `mime_type`. Use [`contains`](Self::contains) first when absence
    /// is expected.
    pub fn get(&self, mime_type: &str) -> Result<&Arc<dyn Codec>, CodecNotFound> {
        self.position(mime_type).map(|index| &self.codecs[index]).ok_or_else(|| CodecNotFound::new(mime_type))
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.position(mime_type).is_some()
    }

    /// A new registry holding the codecs of `self` overlaid by those of `other`.
    #[must_use]
    pub fn merge(&self, other: &ContentTypeRegistry) -> ContentTypeRegistry {
        let mut merged = self.clone();
        merged.add_many(other.codecs.iter().cloned());
        merged
    }

    /// Registered mime types, in registration order.
    pub fn mime_types(&self) -> Vec<&str> {
        self.codecs.iter().map(|codec| codec.mime_type()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Codec>> {
        self.codecs.iter()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Negotiates an `Accept` header against the registered mime types.
    ///
    /// Returns `None` when nothing registered is acceptable to the client.
    pub fn negotiate(&self, accept_header: &str) -> Option<&str> {
        let accept = AcceptHeader::parse(accept_header);
        let negotiated = accept.negotiate(self.codecs.iter().map(|codec| codec.mime_type()));
        debug!(accept = accept_header, negotiated = ?negotiated, "negotiated content type");
        negotiated
    }

    fn position(&self, mime_type: &str) -> Option<usize> {
        self.codecs.iter().position(|codec| codec.mime_type().eq_ignore_ascii_case(mime_type))
    }
}

impl FromIterator<Arc<dyn Codec>> for ContentTypeRegistry {
    fn from_iter<T: IntoIterator<Item = Arc<dyn Codec>>>(iter: T) -> Self {
        let mut registry = Self::new();
        registry.add_many(iter);
        registry
    }
}

impl<'a> IntoIterator for &'a ContentTypeRegistry {
    type Item = &'a Arc<dyn Codec>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Codec>>;

    fn into_iter(self) -> Self::IntoIter {
        self.codecs.iter()
    }
}
