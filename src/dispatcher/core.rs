use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use http::Method;
use serde_json::json;
use tracing::{info, warn};

use crate::diag::{DiagnosticSink, Severity, TracingSink};
use crate::request::body::{decode_body, DecodeError, RequestBody};
use crate::request::ApiRequest;
use crate::response::Response;

use super::args::{ArgValue, Args, DefaultValue};
use super::coerce::{coerce, Primitive};
use super::outcome::{ActionResult, HandlerError, HandlerResult};

/// Binder closure stored per body-typed parameter. Built once at
/// registration from the concrete target type.
pub type BodyBinder =
    Arc<dyn Fn(Option<&[u8]>, bool) -> Result<ArgValue, DecodeError> + Send + Sync>;

/// Type tag of one declared handler parameter.
pub enum ParamKind {
    Primitive(Primitive),
    Body(BodyBinder),
    /// Not bindable. Left unbound deliberately; if the handler consumes it,
    /// invocation fails with an arity error.
    Unsupported,
}

/// One declared handler parameter: name, type tag, nullability, optional
/// default. Built at registration, immutable thereafter.
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) kind: ParamKind,
    pub(crate) nullable: bool,
    pub(crate) default: Option<DefaultValue>,
}

impl ParamSpec {
    fn primitive(name: &str, ty: Primitive) -> Self {
        ParamSpec {
            name: name.to_string(),
            kind: ParamKind::Primitive(ty),
            nullable: false,
            default: None,
        }
    }

    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::primitive(name, Primitive::Str)
    }

    #[must_use]
    pub fn int(name: &str) -> Self {
        Self::primitive(name, Primitive::Int)
    }

    #[must_use]
    pub fn float(name: &str) -> Self {
        Self::primitive(name, Primitive::Float)
    }

    #[must_use]
    pub fn bool(name: &str) -> Self {
        Self::primitive(name, Primitive::Bool)
    }

    /// Body-typed parameter bound through `T`'s [`RequestBody`] mapping.
    #[must_use]
    pub fn body<T: RequestBody>(name: &str) -> Self {
        let binder: BodyBinder = Arc::new(|raw, nullable| {
            Ok(match decode_body::<T>(raw, nullable)? {
                Some(value) => ArgValue::Body(Box::new(value)),
                None => ArgValue::Null,
            })
        });
        ParamSpec {
            name: name.to_string(),
            kind: ParamKind::Body(binder),
            nullable: false,
            default: None,
        }
    }

    /// Parameter of a type the binder does not handle.
    #[must_use]
    pub fn unsupported(name: &str) -> Self {
        ParamSpec {
            name: name.to_string(),
            kind: ParamKind::Unsupported,
            nullable: false,
            default: None,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Declare a default. A default wins over nullability when the value is
    /// absent.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

type HandlerFn = Box<dyn Fn(Args) -> HandlerResult + Send + Sync>;
type StartupFn = Box<dyn Fn(&ApiRequest) -> Result<(), HandlerError> + Send + Sync>;

struct Handler {
    params: Vec<ParamSpec>,
    call: HandlerFn,
}

/// Compute the handler name for a verb+action pair: lower-cased verb plus
/// the action with its first letter upper-cased. `GET` + `index` →
/// `getIndex`. This naming convention is the sole mechanism binding verbs
/// to handlers.
#[must_use]
pub fn handler_name(method: &Method, action: &str) -> String {
    let verb = method.as_str().to_ascii_lowercase();
    let mut name = String::with_capacity(verb.len() + action.len());
    name.push_str(&verb);
    let mut chars = action.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}

/// A named group of handlers plus an optional per-request startup hook.
///
/// Handlers are registered under their full verb+action name (see
/// [`handler_name`]) together with their ordered parameter descriptors. The
/// registry is built once at startup and read-only afterwards, so dispatch
/// is reentrant with no locking.
pub struct Controller {
    module: String,
    name: String,
    startup: Option<StartupFn>,
    handlers: HashMap<String, Handler>,
}

impl Controller {
    #[must_use]
    pub fn new(module: &str, name: &str) -> Self {
        Controller {
            module: module.to_string(),
            name: name.to_string(),
            startup: None,
            handlers: HashMap::new(),
        }
    }

    /// Hook run before handler resolution on every non-OPTIONS request.
    /// A failure flows through the same mapping as handler failures, so
    /// controllers can gate all their actions on e.g. authentication.
    #[must_use]
    pub fn with_startup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.startup = Some(Box::new(hook));
        self
    }

    /// Register a handler under its verb+action name, e.g. `getIndex`.
    /// Re-registering a name replaces the previous handler.
    #[must_use]
    pub fn handler<F>(mut self, name: &str, params: Vec<ParamSpec>, call: F) -> Self
    where
        F: Fn(Args) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            Handler {
                params,
                call: Box::new(call),
            },
        );
        self
    }

    /// Registry identity, `<module>/<name>`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.module, self.name)
    }

    /// Dispatch one request. Never fails: every failure path terminates in
    /// a [`Response`].
    pub fn dispatch(&self, req: &ApiRequest, diag: &dyn DiagnosticSink) -> Response {
        // Protocol-level short-circuit for preflight-style requests.
        if req.method == Method::OPTIONS {
            return Response::no_content();
        }

        if let Some(hook) = &self.startup {
            if let Err(err) = hook(req) {
                return self.failure_response(err, "<startup>", diag);
            }
        }

        let action = match req.action.as_deref() {
            Some(action) if !action.is_empty() => action,
            _ => {
                diag.log(
                    Severity::Critical,
                    "Missing action parameter in request, do you have correct routing set up?",
                    &json!({
                        "controller": self.path(),
                        "method": req.method.as_str(),
                    }),
                );
                return Response::internal_server_error(
                    "Endpoint is unable to route your request",
                );
            }
        };

        let method_name = handler_name(&req.method, action);
        let handler = match self.handlers.get(&method_name) {
            Some(handler) => handler,
            None => return Response::method_not_allowed(&req.method),
        };

        let mut values = Vec::with_capacity(handler.params.len());
        for spec in &handler.params {
            let bound = match &spec.kind {
                ParamKind::Primitive(ty) => {
                    match coerce(
                        req.get_param(&spec.name),
                        &spec.name,
                        *ty,
                        spec.nullable,
                        spec.default.as_ref(),
                    ) {
                        Ok(value) => value,
                        Err(response) => return response,
                    }
                }
                ParamKind::Body(binder) => match binder(req.body_bytes(), spec.nullable) {
                    Ok(value) => value,
                    Err(err) => return decode_failure_response(err),
                },
                ParamKind::Unsupported => ArgValue::Unbound,
            };
            values.push(bound);
        }

        let invoked = catch_unwind(AssertUnwindSafe(|| (handler.call)(Args::new(values))));
        match invoked {
            Ok(Ok(result)) => match result {
                ActionResult::Response(response) => response,
                ActionResult::Text(text) => Response::Text(text),
                ActionResult::Json(value) => Response::Json(value),
                ActionResult::None => Response::no_content(),
            },
            Ok(Err(err)) => self.failure_response(err, &method_name, diag),
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                diag.log(
                    Severity::Error,
                    &detail,
                    &json!({
                        "handler": method_name,
                        "controller": self.path(),
                        "panic": true,
                    }),
                );
                Response::internal_server_error("An unexpected error occurred")
            }
        }
    }

    fn failure_response(
        &self,
        err: HandlerError,
        method_name: &str,
        diag: &dyn DiagnosticSink,
    ) -> Response {
        match err {
            HandlerError::Arity(arity) => {
                diag.log(
                    Severity::Critical,
                    "Invalid action parameters! Cannot resolve parameters for handler.",
                    &json!({
                        "handler": method_name,
                        "controller": self.path(),
                        "position": arity.position,
                        "expected": arity.expected,
                    }),
                );
                Response::internal_server_error("Endpoint is unable to handle your request")
            }
            HandlerError::Unauthenticated(message) => Response::unauthorized(message),
            HandlerError::Forbidden(message) => Response::forbidden(message),
            HandlerError::NotFound(message) => Response::not_found(message),
            HandlerError::Domain(message) => {
                diag.log(
                    Severity::Error,
                    &message,
                    &json!({
                        "handler": method_name,
                        "controller": self.path(),
                    }),
                );
                Response::internal_server_error(message)
            }
            HandlerError::Unexpected(err) => {
                diag.log(
                    Severity::Error,
                    &err.to_string(),
                    &json!({
                        "handler": method_name,
                        "controller": self.path(),
                        "detail": format!("{err:?}"),
                    }),
                );
                Response::internal_server_error("An unexpected error occurred")
            }
        }
    }
}

fn decode_failure_response(err: DecodeError) -> Response {
    match err {
        DecodeError::Missing => Response::bad_request("Missing request body"),
        DecodeError::Malformed => Response::bad_request("Malformed request body"),
        DecodeError::Validation(detail) => Response::bad_request(detail),
    }
}

/// Registry of controllers keyed by `<module>/<name>`, sharing one
/// diagnostic sink.
///
/// Read-only after startup; share it behind an `Arc` and dispatch from any
/// number of worker coroutines.
pub struct Dispatcher {
    controllers: HashMap<String, Arc<Controller>>,
    diag: Arc<dyn DiagnosticSink>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher logging through the `tracing` facade.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    #[must_use]
    pub fn with_sink(diag: Arc<dyn DiagnosticSink>) -> Self {
        Dispatcher {
            controllers: HashMap::new(),
            diag,
        }
    }

    /// Register a controller. An existing controller with the same path is
    /// replaced.
    pub fn register(&mut self, controller: Controller) {
        let key = controller.path();
        if self.controllers.remove(&key).is_some() {
            warn!(controller = %key, "Replaced existing controller");
        }
        info!(
            controller = %key,
            total_controllers = self.controllers.len() + 1,
            "Controller registered"
        );
        self.controllers.insert(key, Arc::new(controller));
    }

    #[must_use]
    pub fn controller(&self, module: &str, name: &str) -> Option<&Arc<Controller>> {
        self.controllers.get(&format!("{module}/{name}"))
    }

    /// Dispatch to a controller by identity. `None` when no such controller
    /// is registered; the transport renders that as a routing 404.
    #[must_use]
    pub fn dispatch(&self, module: &str, controller: &str, req: &ApiRequest) -> Option<Response> {
        let controller = self.controller(module, controller)?;
        Some(controller.dispatch(req, self.diag.as_ref()))
    }
}
