use crate::view::View;
use serde_json::Value;

/// Application logic for one HTTP method on one endpoint.
///
/// The returned value is encoded with the negotiated codec. Handlers that need a status other
/// than `200 OK` set it through the response helpers of [`View`], e.g. [`View::created`].
pub trait MethodHandler: Send + Sync {
    fn handle(&self, view: &mut View<'_>) -> Value;
}

/// a closure holder which represents any `Fn(&mut View) -> Value`
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut View<'_>) -> Value + Send + Sync,
{
    FnHandler { f }
}

impl<F> MethodHandler for FnHandler<F>
where
    F: Fn(&mut View<'_>) -> Value + Send + Sync,
{
    fn handle(&self, view: &mut View<'_>) -> Value {
        (self.f)(view)
    }
}

/// Answers `405 Method Not Allowed`. Every endpoint starts out with this handler for GET, POST,
/// PUT, DELETE, OPTIONS and HEAD.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodNotAllowed;

impl MethodHandler for MethodNotAllowed {
    fn handle(&self, view: &mut View<'_>) -> Value {
        view.method_not_allowed()
    }
}
