//! The request side of the host boundary.
//!
//! The host framework parses the request; the dispatcher only ever reads it through
//! [`HostRequest`]. `http::Request<B>` implements the trait out of the box for any body that can
//! be viewed as bytes, so hosts built on the `http` crate need no adapter.

use http::Request;
use tracing::trace;

/// Read-only view of one incoming request.
pub trait HostRequest {
    /// The request method as sent by the client, e.g. `GET`.
    fn method(&self) -> &str;

    /// The first query string parameter named `name`, url-decoded.
    fn query_param(&self, name: &str) -> Option<String>;

    /// The value of header `name`, if present and valid text.
    fn header(&self, name: &str) -> Option<&str>;

    /// The raw, complete request body.
    fn body(&self) -> &[u8];
}

impl<B> HostRequest for Request<B>
where
    B: AsRef<[u8]>,
{
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri().query()?;
        let pairs = match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => pairs,
            Err(e) => {
                trace!(query, cause = %e, "ignore malformed query string");
                return None;
            }
        };

        pairs.into_iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn body(&self) -> &[u8] {
        Request::body(self).as_ref()
    }
}

/// The resource a request is bound to.
pub trait Resource {
    /// Identifier of the resource, used e.g. to name downloaded files.
    fn id(&self) -> &str;
}

impl Resource for str {
    fn id(&self) -> &str {
        self
    }
}

impl Resource for String {
    fn id(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn request(uri: &str) -> Request<Bytes> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(http::header::ACCEPT, "application/json")
            .body(Bytes::from_static(b"{\"a\": 1}"))
            .unwrap()
    }

    #[test]
    fn query_params_are_decoded() {
        let req = request("/items/10?mimetype=application%2Fx-yaml&downloadfile=true&mimetype=text%2Fhtml");

        assert_eq!(req.query_param("mimetype").as_deref(), Some("application/x-yaml"));
        assert_eq!(req.query_param("downloadfile").as_deref(), Some("true"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn no_query_string() {
        assert_eq!(request("/items/10").query_param("mimetype"), None);
    }

    #[test]
    fn headers_ignore_case() {
        let req = request("/");

        assert_eq!(HostRequest::header(&req, "Accept"), Some("application/json"));
        assert_eq!(HostRequest::header(&req, "accept"), Some("application/json"));
        assert_eq!(HostRequest::header(&req, "x-missing"), None);
    }

    #[test]
    fn method_and_body() {
        let req = request("/");

        assert_eq!(HostRequest::method(&req), "POST");
        assert_eq!(HostRequest::body(&req), b"{\"a\": 1}");
    }

    #[test]
    fn resource_ids() {
        assert_eq!("10".id(), "10");
        assert_eq!(String::from("abc").id(), "abc");
    }
}
