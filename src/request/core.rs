use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of named parameters before heap allocation.
/// Most requests carry ≤8 route/query parameters.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Parameter names use `Arc<str>` so repeated names clone in O(1); values
/// remain `String` as they are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One inbound request, already resolved by the routing layer.
///
/// Immutable once constructed. The transport owns it; the dispatcher borrows
/// it for one dispatch.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP verb (GET, POST, ...)
    pub method: Method,
    /// Logical action name produced by routing. `None` or empty means the
    /// routing layer is misconfigured; the dispatcher reports that itself.
    pub action: Option<String>,
    /// Named route and query parameters. Insertion order is irrelevant;
    /// lookups use last-write-wins.
    pub params: ParamVec,
    /// Raw request body. `None` when absent; an empty `Vec` when the request
    /// carried an empty payload. The body decoder treats both as "no body".
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Request with a resolved action and no parameters or body.
    #[must_use]
    pub fn new(method: Method, action: &str) -> Self {
        Self {
            method,
            action: Some(action.to_string()),
            params: ParamVec::new(),
            body: None,
        }
    }

    /// Request whose routing produced no action parameter.
    #[must_use]
    pub fn without_action(method: Method) -> Self {
        Self {
            method,
            action: None,
            params: ParamVec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.push((Arc::from(name), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a named parameter, last write wins on duplicates.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw body bytes, if any were sent.
    #[inline]
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
