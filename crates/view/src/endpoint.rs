//! Endpoint configuration: which content types, which authorizer, which handler per method.
//!
//! An [`Endpoint`] is assembled once with [`Endpoint::builder`] and then serves any number of
//! requests, each through its own [`View`].

use crate::auth::{AllowAll, Authorizer};
use crate::error::RenderError;
use crate::handler::{MethodHandler, MethodNotAllowed};
use crate::request::{HostRequest, Resource};
use crate::response::HostResponse;
use crate::view::View;
use bytes::Bytes;
use http::Method;
use micro_rest_codec::ContentTypeRegistry;
use std::fmt;

/// Methods every endpoint answers, with `405 Method Not Allowed` unless overridden.
pub const DEFAULT_METHODS: [Method; 6] =
    [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS, Method::HEAD];

pub struct Endpoint {
    content_types: ContentTypeRegistry,
    handlers: Vec<(Method, Box<dyn MethodHandler>)>,
    authorizer: Box<dyn Authorizer>,
}

impl Endpoint {
    pub fn builder() -> EndpointBuilder {
        EndpointBuilder::new()
    }

    pub fn content_types(&self) -> &ContentTypeRegistry {
        &self.content_types
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    /// The handler registered for `method`, if the endpoint supports it at all.
    pub fn handler(&self, method: &Method) -> Option<&dyn MethodHandler> {
        self.handlers.iter().find(|(m, _)| m == method).map(|(_, handler)| handler.as_ref())
    }

    /// Supported methods in registration order, the default ones first.
    pub fn supported_methods(&self) -> impl Iterator<Item = &Method> {
        self.handlers.iter().map(|(method, _)| method)
    }

    /// Starts handling one request.
    pub fn view<'a, R>(
        &'a self,
        request: &'a dyn HostRequest,
        response: &'a mut dyn HostResponse,
        resource: &'a R,
    ) -> View<'a>
    where
        R: Resource + ?Sized,
    {
        View::new(self, request, response, resource.id())
    }

    /// Handles one request from start to finish and returns the encoded response body.
    pub fn render<R>(
        &self,
        request: &dyn HostRequest,
        response: &mut dyn HostResponse,
        resource: &R,
    ) -> Result<Bytes, RenderError>
    where
        R: Resource + ?Sized,
    {
        self.view(request, response, resource).render()
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("content_types", &self.content_types.mime_types())
            .field("methods", &self.supported_methods().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

macro_rules! method_handler {
    ($method:ident, $method_const:ident) => {
        #[must_use]
        pub fn $method<H: MethodHandler + 'static>(self, handler: H) -> Self {
            self.route(Method::$method_const, handler)
        }
    };
}

pub struct EndpointBuilder {
    content_types: Option<ContentTypeRegistry>,
    handlers: Vec<(Method, Box<dyn MethodHandler>)>,
    authorizer: Option<Box<dyn Authorizer>>,
}

impl EndpointBuilder {
    fn new() -> Self {
        let handlers = DEFAULT_METHODS
            .into_iter()
            .map(|method| (method, Box::new(MethodNotAllowed) as Box<dyn MethodHandler>))
            .collect();
        Self { content_types: None, handlers, authorizer: None }
    }

    /// Defaults to [`ContentTypeRegistry::defaults`].
    #[must_use]
    pub fn content_types(mut self, content_types: ContentTypeRegistry) -> Self {
        self.content_types = Some(content_types);
        self
    }

    /// Defaults to [`AllowAll`].
    #[must_use]
    pub fn authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Some(Box::new(authorizer));
        self
    }

    /// Registers `handler` for `method`, replacing a previous one. Methods outside of
    /// [`DEFAULT_METHODS`] become supported this way.
    #[must_use]
    pub fn route<H: MethodHandler + 'static>(mut self, method: Method, handler: H) -> Self {
        let handler: Box<dyn MethodHandler> = Box::new(handler);
        match self.handlers.iter_mut().find(|(m, _)| *m == method) {
            Some((_, existing)) => *existing = handler,
            None => self.handlers.push((method, handler)),
        }
        self
    }

    method_handler!(get, GET);
    method_handler!(post, POST);
    method_handler!(put, PUT);
    method_handler!(delete, DELETE);
    method_handler!(options, OPTIONS);
    method_handler!(head, HEAD);
    method_handler!(patch, PATCH);

    pub fn build(self) -> Endpoint {
        Endpoint {
            content_types: self.content_types.unwrap_or_else(ContentTypeRegistry::defaults),
            handlers: self.handlers,
            authorizer: self.authorizer.unwrap_or_else(|| Box::new(AllowAll)),
        }
    }
}
