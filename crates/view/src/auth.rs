//! The authorization seam.
//!
//! Checking permissions belongs to the host. The dispatcher calls the [`Authorizer`] of an
//! endpoint once per request, before content negotiation, and only cares about the outcome.

use crate::error::AuthorizationError;
use crate::request::HostRequest;

#[cfg_attr(test, mockall::automock)]
pub trait Authorizer: Send + Sync {
    /// `Ok(())` lets the request through. [`AuthorizationError::Unauthorized`] becomes a 401
    /// response; any other error is returned to the caller of `render`.
    fn authorize(&self, request: &dyn HostRequest, resource_id: &str) -> Result<(), AuthorizationError>;
}

/// Lets every request through. The default of every endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _request: &dyn HostRequest, _resource_id: &str) -> Result<(), AuthorizationError> {
        Ok(())
    }
}

/// An [`Authorizer`] made from a closure, see [`authorizer_fn`].
#[derive(Debug)]
pub struct FnAuthorizer<F> {
    f: F,
}

pub fn authorizer_fn<F>(f: F) -> FnAuthorizer<F>
where
    F: Fn(&dyn HostRequest, &str) -> Result<(), AuthorizationError> + Send + Sync,
{
    FnAuthorizer { f }
}

impl<F> Authorizer for FnAuthorizer<F>
where
    F: Fn(&dyn HostRequest, &str) -> Result<(), AuthorizationError> + Send + Sync,
{
    fn authorize(&self, request: &dyn HostRequest, resource_id: &str) -> Result<(), AuthorizationError> {
        (self.f)(request, resource_id)
    }
}
