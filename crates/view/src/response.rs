//! The response side of the host boundary.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};

/// The response object the dispatcher mutates while handling one request.
pub trait HostResponse {
    fn set_status(&mut self, status: StatusCode, reason: &str);

    /// Replaces any previous value of header `name`.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    fn remove_header(&mut self, name: &HeaderName);

    fn status(&self) -> StatusCode;

    fn reason(&self) -> &str;
}

/// A ready made [`HostResponse`] that collects status and headers, and converts into an
/// `http::Response` once the body has been rendered.
#[derive(Debug, Clone)]
pub struct RestResponse {
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
}

impl RestResponse {
    pub fn new() -> Self {
        Self { status: StatusCode::OK, reason: "OK".to_string(), headers: HeaderMap::new() }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The value of header `name` as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// `(status code, status message)`, the way the dispatcher last set them.
    pub fn status_line(&self) -> (u16, &str) {
        (self.status.as_u16(), &self.reason)
    }

    /// Attaches `body`. The custom status message is not carried over, `http` has no field for it.
    pub fn into_http(self, body: Bytes) -> Response<Bytes> {
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for RestResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HostResponse for RestResponse {
    fn set_status(&mut self, status: StatusCode, reason: &str) {
        self.status = status;
        reason.clone_into(&mut self.reason);
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn remove_header(&mut self, name: &HeaderName) {
        self.headers.remove(name);
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn reason(&self) -> &str {
        &self.reason
    }
}
