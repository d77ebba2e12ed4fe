use micro_rest_codec::DecodeError;
use serde_json::{Value, json};
use std::error::Error as StdError;
use thiserror::Error;

/// Signalled by an [`Authorizer`](crate::Authorizer).
///
/// Only `Unauthorized` is turned into a 401 response. `Failed` means the check itself broke
/// and is handed back to the host unchanged.
#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("authorization failed: {source}")]
    Failed { source: Box<dyn StdError + Send + Sync> },
}

impl AuthorizationError {
    pub fn unauthorized<S: ToString>(message: S) -> Self {
        Self::Unauthorized { message: message.to_string() }
    }

    pub fn failed<E: Into<Box<dyn StdError + Send + Sync>>>(e: E) -> Self {
        Self::Failed { source: e.into() }
    }
}

/// Neither the `mimetype` query parameter nor the `Accept` header named a supported content type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not determine content type, querystring: {querystring_reason}, accept: {accept_reason}")]
pub struct ContentTypeUnresolved {
    querystring_reason: String,
    accept_reason: String,
    supported: Vec<String>,
}

impl ContentTypeUnresolved {
    pub fn new<Q: ToString, A: ToString>(querystring_reason: Q, accept_reason: A, supported: Vec<String>) -> Self {
        Self { querystring_reason: querystring_reason.to_string(), accept_reason: accept_reason.to_string(), supported }
    }

    pub fn querystring_reason(&self) -> &str {
        &self.querystring_reason
    }

    pub fn accept_reason(&self) -> &str {
        &self.accept_reason
    }

    /// Mime types the endpoint can produce, in registration order.
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    /// The diagnostic body of a 406 response.
    pub fn to_body(&self) -> Value {
        json!({
            "error": "Not Acceptable: could not determine a supported content type",
            "querystring": self.querystring_reason,
            "accept": self.accept_reason,
            "supported_mimetypes": self.supported,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("request body must be a mapping of field names to values, got {found}")]
pub struct InvalidShapeError {
    found: &'static str,
}

impl InvalidShapeError {
    pub(crate) fn of(value: &Value) -> Self {
        let found = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "a mapping",
        };
        Self { found }
    }

    /// Kind of value the body decoded to.
    pub fn found(&self) -> &str {
        self.found
    }
}

/// Why the request body could not be handed to a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestDataError {
    #[error(transparent)]
    ContentType {
        #[from]
        source: ContentTypeUnresolved,
    },

    #[error("invalid request body: {source}")]
    Decode {
        #[from]
        source: DecodeError,
    },

    #[error(transparent)]
    InvalidShape {
        #[from]
        source: InvalidShapeError,
    },
}

/// Failures that escape [`View::render`](crate::View::render). Everything else ends up as a
/// response.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render error: {source}")]
    Authorization {
        #[from]
        source: AuthorizationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_body() {
        let err = ContentTypeUnresolved::new(
            "no mimetype in the querystring",
            "no Accept header",
            vec!["application/json".to_string(), "application/x-yaml".to_string()],
        );

        let body = err.to_body();

        assert!(body["error"].as_str().unwrap().starts_with("Not Acceptable"));
        assert_eq!(body["querystring"], "no mimetype in the querystring");
        assert_eq!(body["accept"], "no Accept header");
        assert_eq!(body["supported_mimetypes"], json!(["application/json", "application/x-yaml"]));
    }

    #[test]
    fn shape_names_the_found_kind() {
        let err = InvalidShapeError::of(&json!([1, 2]));

        assert_eq!(err.found(), "an array");
        assert_eq!(err.to_string(), "request body must be a mapping of field names to values, got an array");
    }

    #[test]
    fn request_data_error_keeps_its_kind() {
        let err: RequestDataError = DecodeError::new("expected value at line 1 column 1").into();

        assert!(matches!(err, RequestDataError::Decode { .. }));
        assert_eq!(err.to_string(), "invalid request body: decode error: expected value at line 1 column 1");
    }

    #[test]
    fn failed_authorization_keeps_source() {
        let err = AuthorizationError::failed("backend down");

        assert_eq!(err.to_string(), "authorization failed: backend down");
        assert!(err.source().is_some());
    }
}
