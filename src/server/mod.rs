//! # Server Module
//!
//! Transport adapter on top of `may_minihttp`: parses inbound HTTP requests,
//! resolves them through the [`crate::router::ApiRouter`], dispatches to the
//! controller registry, and writes the resulting
//! [`crate::response::Response`] back to the socket.
//!
//! The dispatcher core performs no I/O itself; everything socket-shaped
//! lives here.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, ParsedRequest};
pub use response::{write_json_error, write_response};
pub use service::AppService;
