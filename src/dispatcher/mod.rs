//! # Dispatcher Module
//!
//! The heart of the crate: resolve an HTTP verb + action name to a
//! registered handler, bind its declared parameters, invoke it, and map the
//! outcome to a [`crate::response::Response`].
//!
//! ## Resolution
//!
//! Handler selection is purely name-based: the lower-cased verb is glued to
//! the capitalized action (`GET` + `index` → `getIndex`) and looked up in
//! the controller's registry. There is no separate verb-matching table; an
//! unknown name is a 405.
//!
//! ## Binding
//!
//! Each handler declares an ordered list of [`ParamSpec`] descriptors at
//! registration time. The dispatcher walks them in order:
//!
//! - primitive kinds go through the coercer (default → required → nullable
//!   precedence, then a strict cast),
//! - body kinds go through the JSON decoder and the target type's
//!   [`crate::request::body::RequestBody::map`],
//! - unsupported kinds stay unbound and surface as an arity failure only if
//!   the handler actually consumes them.
//!
//! ## Outcome mapping
//!
//! Handlers return [`HandlerResult`]. Scalar results render as text,
//! composite results as JSON, unit as 204, and a prebuilt response passes
//! through. Failures map to a fixed status table; only domain and
//! unexpected failures reach the diagnostic sink, client-addressable ones
//! do not.
//!
//! ```no_run
//! use actiondispatch::dispatcher::{Controller, Dispatcher, ParamSpec};
//!
//! let users = Controller::new("shop", "users").handler(
//!     "getIndex",
//!     vec![ParamSpec::string("name")],
//!     |mut args| {
//!         let name = args.take_str()?;
//!         Ok(format!("hello {name}").into())
//!     },
//! );
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(users);
//! ```

mod args;
mod coerce;
mod core;
mod outcome;

pub use args::{ArgValue, Args, ArityError, DefaultValue};
pub use coerce::Primitive;
pub use core::{handler_name, BodyBinder, Controller, Dispatcher, ParamKind, ParamSpec};
pub use outcome::{ActionResult, HandlerError, HandlerResult};
