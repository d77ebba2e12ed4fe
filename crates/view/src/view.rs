//! Per request dispatch.
//!
//! A [`View`] drives one request through the states of [`State`]:
//!
//! ```text
//! Start -> Authorizing -> ContentTypeResolved -> Handling -> Encoding -> Done
//! ```
//!
//! Every state may move to `Error`. Authorization failures, unresolvable content types and
//! encode failures are all turned into responses here; only a broken authorizer escapes
//! [`View::render`].

use crate::endpoint::Endpoint;
use crate::error::{AuthorizationError, ContentTypeUnresolved, InvalidShapeError, RenderError, RequestDataError};
use crate::request::HostRequest;
use crate::response::HostResponse;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, Method, StatusCode};
use micro_rest_codec::{Codec, CodecContext, JsonCodec};
use once_cell::unsync::OnceCell;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Query parameter that overrides `Accept` header negotiation.
pub const MIMETYPE_PARAM: &str = "mimetype";

/// Query parameter that, set to `true`, asks for a `Content-Disposition: attachment` header.
pub const DOWNLOAD_PARAM: &str = "downloadfile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Authorizing,
    ContentTypeResolved,
    Handling,
    Encoding,
    Done,
    Error,
}

pub struct View<'a> {
    endpoint: &'a Endpoint,
    request: &'a dyn HostRequest,
    response: &'a mut dyn HostResponse,
    resource_id: &'a str,
    content_type: OnceCell<Result<Arc<dyn Codec>, ContentTypeUnresolved>>,
    state: State,
}

impl<'a> View<'a> {
    pub(crate) fn new(
        endpoint: &'a Endpoint,
        request: &'a dyn HostRequest,
        response: &'a mut dyn HostResponse,
        resource_id: &'a str,
    ) -> Self {
        Self { endpoint, request, response, resource_id, content_type: OnceCell::new(), state: State::Start }
    }

    pub fn endpoint(&self) -> &'a Endpoint {
        self.endpoint
    }

    pub fn request(&self) -> &'a dyn HostRequest {
        self.request
    }

    pub fn response(&self) -> &dyn HostResponse {
        &*self.response
    }

    pub fn resource_id(&self) -> &'a str {
        self.resource_id
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs the whole request and returns the encoded response body.
    pub fn render(&mut self) -> Result<Bytes, RenderError> {
        self.state = State::Authorizing;
        match self.endpoint.authorizer().authorize(self.request, self.resource_id) {
            Ok(()) => {}
            Err(AuthorizationError::Unauthorized { message }) => {
                warn!(resource = self.resource_id, reason = %message, "request is not authorized");
                self.state = State::Error;
                return Ok(self.render_unauthorized());
            }
            Err(e) => {
                error!(resource = self.resource_id, cause = %e, "authorizer failed");
                self.state = State::Error;
                return Err(e.into());
            }
        }

        let codec = match self.content_type() {
            Ok(codec) => codec,
            Err(unresolved) => {
                warn!(
                    querystring = unresolved.querystring_reason(),
                    accept = unresolved.accept_reason(),
                    "no acceptable content type"
                );
                self.state = State::Error;
                return Ok(self.render_not_acceptable(&unresolved));
            }
        };

        let output = self.handle_with(&*codec);

        self.state = State::Encoding;
        let body = self.encode_output(&*codec, &output);
        if self.state != State::Error {
            self.state = State::Done;
        }
        Ok(body)
    }

    /// Sets the response headers and default status, then runs the handler of the request
    /// method. The handler output is returned unencoded.
    pub fn handle(&mut self) -> Result<Value, ContentTypeUnresolved> {
        let codec = self.content_type()?;
        Ok(self.handle_with(&*codec))
    }

    fn handle_with(&mut self, codec: &dyn Codec) -> Value {
        self.state = State::ContentTypeResolved;

        self.set_header(CONTENT_TYPE, &format!("{}; charset=UTF-8", codec.mime_type()));
        if self.request.query_param(DOWNLOAD_PARAM).as_deref() == Some("true") {
            let disposition = format!("attachment; filename={}.{}", self.resource_id, codec.extension());
            self.set_header(CONTENT_DISPOSITION, &disposition);
        }
        self.response.set_status(StatusCode::OK, "OK");

        self.state = State::Handling;
        let endpoint = self.endpoint;
        let handler = self.request_method().and_then(|method| endpoint.handler(&method));
        debug!(method = self.request.method(), resource = self.resource_id, found = handler.is_some(), "dispatch");

        match handler {
            Some(handler) => handler.handle(self),
            None => self.method_not_allowed(),
        }
    }

    /// The request method, upper cased. `None` if it is not a valid method token.
    pub fn request_method(&self) -> Option<Method> {
        Method::from_bytes(self.request.method().to_ascii_uppercase().as_bytes()).ok()
    }

    /// The codec of this request, resolved on first use and memoized afterwards.
    ///
    /// A supported `mimetype` query parameter wins; otherwise the `Accept` header is negotiated
    /// against the registry of the endpoint.
    pub fn content_type(&self) -> Result<Arc<dyn Codec>, ContentTypeUnresolved> {
        self.content_type.get_or_init(|| self.resolve_content_type()).clone()
    }

    fn resolve_content_type(&self) -> Result<Arc<dyn Codec>, ContentTypeUnresolved> {
        let registry = self.endpoint.content_types();

        let querystring_reason = match self.request.query_param(MIMETYPE_PARAM).filter(|m| !m.is_empty()) {
            Some(mime_type) => match registry.get(&mime_type) {
                Ok(codec) => {
                    debug!(mime_type = %mime_type, "content type from querystring");
                    return Ok(Arc::clone(codec));
                }
                Err(e) => format!("{MIMETYPE_PARAM}={mime_type} is not supported, {e}"),
            },
            None => format!("no {MIMETYPE_PARAM} in the querystring"),
        };

        let accept_reason = match self.request.header(ACCEPT.as_str()).filter(|h| !h.trim().is_empty()) {
            Some(accept) => {
                if let Some(codec) = registry.negotiate(accept).and_then(|m| registry.get(m).ok()) {
                    return Ok(Arc::clone(codec));
                }
                format!("no supported mime type matches the Accept header: {accept}")
            }
            None => "no Accept header".to_string(),
        };

        let supported = registry.mime_types().into_iter().map(str::to_string).collect();
        Err(ContentTypeUnresolved::new(querystring_reason, accept_reason, supported))
    }

    /// Decodes the request body with the codec of this request.
    pub fn request_data(&self) -> Result<Value, RequestDataError> {
        let codec = self.content_type()?;
        let ctx = self.codec_context();
        Ok(codec.decode(self.request.body(), &ctx)?)
    }

    /// Like [`request_data`](Self::request_data), but the body must decode to a mapping.
    pub fn request_data_as_object(&self) -> Result<Map<String, Value>, RequestDataError> {
        match self.request_data()? {
            Value::Object(map) => Ok(map),
            other => Err(InvalidShapeError::of(&other).into()),
        }
    }

    /// Sets the status and hands `body` back, for handlers to return.
    pub fn respond(&mut self, status: StatusCode, message: &str, body: Value) -> Value {
        self.response.set_status(status, message);
        body
    }

    pub fn bad_request(&mut self, body: Value) -> Value {
        self.respond(StatusCode::BAD_REQUEST, "Bad Request", body)
    }

    pub fn unauthorized(&mut self) -> Value {
        self.respond(StatusCode::UNAUTHORIZED, "Unauthorized", json!({"error": "Unauthorized"}))
    }

    pub fn created(&mut self, body: Value) -> Value {
        self.respond(StatusCode::CREATED, "Created", body)
    }

    /// The message quotes the method the way the client sent it.
    pub fn method_not_allowed(&mut self) -> Value {
        let message = format!("Method Not Allowed: {}", self.request.method());
        let body = json!({ "error": message });
        self.respond(StatusCode::METHOD_NOT_ALLOWED, &message, body)
    }

    fn render_unauthorized(&mut self) -> Bytes {
        let output = self.unauthorized();
        let codec = self.content_type().unwrap_or_else(|_| Arc::new(JsonCodec::new()));
        self.set_header(CONTENT_TYPE, &format!("{}; charset=UTF-8", codec.mime_type()));
        self.encode_output(&*codec, &output)
    }

    fn render_not_acceptable(&mut self, unresolved: &ContentTypeUnresolved) -> Bytes {
        let output = self.respond(StatusCode::NOT_ACCEPTABLE, "Not Acceptable", unresolved.to_body());
        let codec = JsonCodec::new();
        self.set_header(CONTENT_TYPE, &format!("{}; charset=UTF-8", codec.mime_type()));
        self.encode_output(&codec, &output)
    }

    /// Never fails: when `codec` can not encode `output` the response becomes a plain text
    /// `400 Bad Request` that describes the failure.
    fn encode_output(&mut self, codec: &dyn Codec, output: &Value) -> Bytes {
        let encoded = codec.encode(output, &self.codec_context());
        match encoded {
            Ok(body) => body,
            Err(e) => {
                let status = self.response.status();
                let message = format!(
                    "Failed to encode the response as {}: {e}. The response status before the failure was: {} {}",
                    codec.mime_type(),
                    status.as_u16(),
                    self.response.reason(),
                );
                warn!(mime_type = codec.mime_type(), cause = %e, "encode failed, respond with plain text");

                self.state = State::Error;
                self.set_header(CONTENT_TYPE, "text/plain; charset=UTF-8");
                // the diagnostic is not the requested file
                self.response.remove_header(&CONTENT_DISPOSITION);
                self.response.set_status(StatusCode::BAD_REQUEST, "Bad Request");
                Bytes::from(message)
            }
        }
    }

    fn codec_context(&self) -> CodecContext<'_> {
        CodecContext::new(self.endpoint.content_types(), self.response.status(), self.response.reason())
    }

    fn set_header(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => self.response.set_header(name, value),
            Err(e) => error!(header = %name, value, cause = %e, "skip invalid header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AllowAll, MockAuthorizer};
    use crate::handler::handler_fn;
    use crate::response::RestResponse;
    use http::Request;
    use micro_rest_codec::ContentTypeRegistry;

    fn request(method: &str, uri: &str, accept: Option<&str>, body: &'static str) -> Request<Bytes> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder.body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    fn echo_endpoint() -> Endpoint {
        Endpoint::builder()
            .get(handler_fn(|_view| json!({"hello": "world"})))
            .post(handler_fn(|view| match view.request_data_as_object() {
                Ok(data) => view.created(Value::Object(data)),
                Err(e) => view.bad_request(json!({"error": e.to_string()})),
            }))
            .build()
    }

    #[test]
    fn querystring_wins_over_accept_header() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/?mimetype=application/x-yaml", Some("application/json"), "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");

        assert_eq!(view.content_type().unwrap().mime_type(), "application/x-yaml");
    }

    #[test]
    fn unsupported_querystring_falls_back_to_accept_header() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/?mimetype=text/html", Some("application/x-yaml"), "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");

        assert_eq!(view.content_type().unwrap().mime_type(), "application/x-yaml");
    }

    #[test]
    fn empty_values_count_as_absent() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/?mimetype=", Some(" "), "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");
        let err = view.content_type().unwrap_err();

        assert_eq!(err.querystring_reason(), "no mimetype in the querystring");
        assert_eq!(err.accept_reason(), "no Accept header");
        assert_eq!(err.supported(), ["application/json", "application/x-yaml"]);
    }

    #[test]
    fn unresolved_reasons() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/?mimetype=text/html", Some("application/html"), "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");
        let err = view.content_type().unwrap_err();

        assert!(err.querystring_reason().contains("text/html"));
        assert!(err.accept_reason().contains("application/html"));
    }

    #[test]
    fn content_type_is_memoized() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/", Some("application/json"), "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");

        let first = view.content_type().unwrap();
        let second = view.content_type().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn handle_sets_headers_and_status() {
        let endpoint = echo_endpoint();
        let req = request("get", "/?downloadfile=true", Some("application/x-yaml"), "");
        let mut response = RestResponse::new();
        response.set_status(StatusCode::IM_A_TEAPOT, "Teapot");

        let output = endpoint.view(&req, &mut response, "10").handle().unwrap();

        assert_eq!(output, json!({"hello": "world"}));
        assert_eq!(response.status_line(), (200, "OK"));
        assert_eq!(response.header("content-type"), Some("application/x-yaml; charset=UTF-8"));
        assert_eq!(response.header("content-disposition"), Some("attachment; filename=10.yaml"));
    }

    #[test]
    fn no_download_header_unless_asked() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/?downloadfile=yes", Some("application/json"), "");
        let mut response = RestResponse::new();

        endpoint.view(&req, &mut response, "10").handle().unwrap();

        assert_eq!(response.header("content-disposition"), None);
    }

    #[test]
    fn unknown_method_is_not_allowed() {
        let endpoint = echo_endpoint();
        let req = request("Trace", "/", Some("application/json"), "");
        let mut response = RestResponse::new();

        let output = endpoint.view(&req, &mut response, "10").handle().unwrap();

        assert_eq!(output, json!({"error": "Method Not Allowed: Trace"}));
        assert_eq!(response.status_line(), (405, "Method Not Allowed: Trace"));
    }

    #[test]
    fn request_method_is_normalized() {
        let endpoint = echo_endpoint();
        let req = request("post", "/", None, "");
        let mut response = RestResponse::new();

        let view = endpoint.view(&req, &mut response, "10");

        assert_eq!(view.request_method(), Some(Method::POST));
    }

    #[test]
    fn request_data_errors_keep_their_kind() {
        let endpoint = echo_endpoint();
        let mut response = RestResponse::new();

        let req = request("POST", "/", Some("application/json"), "{not json");
        let err = endpoint.view(&req, &mut response, "10").request_data().unwrap_err();
        assert!(matches!(err, RequestDataError::Decode { .. }));

        let req = request("POST", "/", Some("application/json"), "[1, 2]");
        let err = endpoint.view(&req, &mut response, "10").request_data_as_object().unwrap_err();
        assert!(matches!(err, RequestDataError::InvalidShape { .. }));

        let req = request("POST", "/", Some("text/csv"), "a,b");
        let err = endpoint.view(&req, &mut response, "10").request_data().unwrap_err();
        assert!(matches!(err, RequestDataError::ContentType { .. }));
    }

    #[test]
    fn render_states() {
        let endpoint = echo_endpoint();
        let req = request("GET", "/", Some("application/json"), "");
        let mut response = RestResponse::new();

        {
            let mut view = endpoint.view(&req, &mut response, "10");
            assert_eq!(view.state(), State::Start);

            view.render().unwrap();
            assert_eq!(view.state(), State::Done);
        }

        let req = request("GET", "/", Some("text/csv"), "");
        let mut view = endpoint.view(&req, &mut response, "10");
        view.render().unwrap();
        assert_eq!(view.state(), State::Error);
    }

    #[test]
    fn unauthorized_uses_negotiated_codec_when_possible() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_authorize().times(2).returning(|_, _| Err(AuthorizationError::unauthorized("denied")));
        let endpoint = Endpoint::builder().authorizer(authorizer).build();

        let req = request("GET", "/", Some("application/x-yaml"), "");
        let mut response = RestResponse::new();
        let body = endpoint.render(&req, &mut response, "10").unwrap();

        assert_eq!(response.status_line(), (401, "Unauthorized"));
        assert_eq!(response.header("content-type"), Some("application/x-yaml; charset=UTF-8"));
        assert_eq!(body, Bytes::from_static(b"error: Unauthorized\n"));

        let req = request("GET", "/", Some("text/csv"), "");
        let mut response = RestResponse::new();
        let body = endpoint.render(&req, &mut response, "10").unwrap();

        assert_eq!(response.status_line(), (401, "Unauthorized"));
        assert_eq!(response.header("content-type"), Some("application/json; charset=UTF-8"));
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"error": "Unauthorized"}));
    }

    #[test]
    fn failing_authorizer_escapes_render() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_authorize().returning(|_, _| Err(AuthorizationError::failed("backend down")));
        let endpoint = Endpoint::builder().authorizer(authorizer).build();

        let req = request("GET", "/", Some("application/json"), "");
        let mut response = RestResponse::new();
        let err = endpoint.render(&req, &mut response, "10").unwrap_err();

        assert!(matches!(err, RenderError::Authorization { source: AuthorizationError::Failed { .. } }));
    }

    #[test]
    fn authorizer_is_asked_before_negotiation() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_authorize().withf(|_, resource_id| resource_id == "10").times(1).returning(|_, _| Ok(()));
        let endpoint = Endpoint::builder()
            .authorizer(authorizer)
            .content_types(ContentTypeRegistry::new().with(JsonCodec::new()))
            .build();

        let req = request("GET", "/", Some("application/x-yaml"), "");
        let mut response = RestResponse::new();
        endpoint.render(&req, &mut response, "10").unwrap();

        assert_eq!(response.status_line(), (406, "Not Acceptable"));
    }

    #[test]
    fn allow_all_is_the_default() {
        let endpoint = Endpoint::builder().authorizer(AllowAll).build();
        let req = request("GET", "/", Some("*/*"), "");
        let mut response = RestResponse::new();

        endpoint.render(&req, &mut response, "10").unwrap();

        assert_eq!(response.status_line(), (405, "Method Not Allowed: GET"));
    }
}
