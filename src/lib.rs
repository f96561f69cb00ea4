//! # actiondispatch
//!
//! **actiondispatch** is a verb+action request-dispatch layer for Rust
//! services running on the `may` coroutine runtime.
//!
//! ## Overview
//!
//! The crate sits between an HTTP transport and application-defined action
//! handlers. Given an inbound request already resolved to a controller +
//! action pair, it selects the handler by combining the HTTP verb with the
//! action name (`GET` + `index` → `getIndex`), binds route parameters
//! and/or a decoded JSON body into typed arguments, invokes the handler,
//! and converts the return value or failure into a uniform response.
//!
//! ## Architecture
//!
//! - **[`dispatcher`]** - handler registry, parameter binding, invocation,
//!   and the failure-kind → status-code mapping
//! - **[`request`]** - the request model and the body decoding capability
//!   ([`request::body::RequestBody`] / [`request::body::AutoMappingBody`])
//! - **[`response`]** - the closed set of response variants with a
//!   render-once contract
//! - **[`router`]** - fixed-shape `api/<version>/<module>/<controller>/
//!   <action>[/<id>]` path resolution
//! - **[`server`]** - HTTP transport adapter built on `may_minihttp`
//! - **[`diag`]** - fire-and-forget diagnostic sink backed by `tracing`
//!
//! ## Request Handling Flow
//!
//! 1. The server parses the raw HTTP request and resolves the route triple.
//! 2. The dispatcher looks up the controller and computes the handler name
//!    from verb + action; OPTIONS short-circuits to 204, an unknown name is
//!    a 405.
//! 3. Declared parameters bind in order: primitives through the coercer
//!    (default → required → nullable precedence), body targets through
//!    JSON decoding and the target type's own validation.
//! 4. The handler runs; scalars render as text, composite values as JSON,
//!    unit as 204, prebuilt responses pass through. Failures map to a fixed
//!    status table, and only server-side ones are logged.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use actiondispatch::dispatcher::{Controller, Dispatcher, ParamSpec};
//! use actiondispatch::router::ApiRouter;
//! use actiondispatch::server::{AppService, HttpServer};
//!
//! let users = Controller::new("shop", "users").handler(
//!     "getIndex",
//!     vec![
//!         ParamSpec::string("name"),
//!         ParamSpec::string("greeting").with_default("hello"),
//!     ],
//!     |mut args| {
//!         let name = args.take_str()?;
//!         let greeting = args.take_str()?;
//!         Ok(format!("{greeting} {name}").into())
//!     },
//! );
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(users);
//!
//! let service = AppService::new(ApiRouter::new("v1"), Arc::new(dispatcher));
//! let handle = HttpServer(service).start("0.0.0.0:8080").unwrap();
//! handle.join().unwrap();
//! ```
//!
//! ## Runtime Considerations
//!
//! The transport uses the `may` coroutine runtime, not tokio. The
//! dispatcher core is runtime-agnostic: it is stateless, reentrant, and
//! performs no I/O, so one dispatch per inbound request can run on any
//! number of worker coroutines with no locking.

pub mod diag;
pub mod dispatcher;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use diag::{DiagnosticSink, Severity, TracingSink};
pub use dispatcher::{
    ActionResult, Args, ArityError, Controller, Dispatcher, HandlerError, HandlerResult, ParamSpec,
};
pub use request::body::{AutoMappingBody, MapError, RequestBody};
pub use request::{ApiRequest, ParamVec};
pub use response::Response;
pub use router::{ApiRoute, ApiRouter};
