//! Request dispatch with content negotiation for REST endpoints.
//!
//! An [`Endpoint`] bundles a [`ContentTypeRegistry`](micro_rest_codec::ContentTypeRegistry), an
//! [`Authorizer`] and one [`MethodHandler`] per HTTP method. For every request the host framework
//! hands over a [`HostRequest`] and a [`HostResponse`]; the endpoint then
//!
//! - authorizes the request,
//! - picks the representation from the `mimetype` query parameter or the `Accept` header,
//! - runs the handler of the request method,
//! - and encodes whatever the handler returned.
//!
//! Authorization failures, unresolvable content types and unencodable output all end up as
//! regular responses (401, 406 and 400).
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use micro_rest_view::{Endpoint, RestResponse, handler_fn};
//! use serde_json::json;
//!
//! let endpoint = Endpoint::builder()
//!     .post(handler_fn(|view| match view.request_data_as_object() {
//!         Ok(data) => view.created(data.into()),
//!         Err(e) => view.bad_request(json!({"error": e.to_string()})),
//!     }))
//!     .build();
//!
//! let request = http::Request::post("/items/10")
//!     .header("Accept", "application/json")
//!     .body(Bytes::from_static(br#"{"a": "test"}"#))
//!     .unwrap();
//! let mut response = RestResponse::new();
//!
//! let body = endpoint.render(&request, &mut response, "10").unwrap();
//!
//! assert_eq!(response.status_line(), (201, "Created"));
//! assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!({"a": "test"}));
//! ```

mod auth;
mod endpoint;
mod error;
mod handler;
mod request;
mod response;
mod view;

pub mod html;

pub use auth::AllowAll;
pub use auth::Authorizer;
pub use auth::FnAuthorizer;
pub use auth::authorizer_fn;
pub use endpoint::DEFAULT_METHODS;
pub use endpoint::Endpoint;
pub use endpoint::EndpointBuilder;
pub use error::AuthorizationError;
pub use error::ContentTypeUnresolved;
pub use error::InvalidShapeError;
pub use error::RenderError;
pub use error::RequestDataError;
pub use handler::FnHandler;
pub use handler::MethodHandler;
pub use handler::MethodNotAllowed;
pub use handler::handler_fn;
pub use request::HostRequest;
pub use request::Resource;
pub use response::HostResponse;
pub use response::RestResponse;
pub use view::DOWNLOAD_PARAM;
pub use view::MIMETYPE_PARAM;
pub use view::State;
pub use view::View;
