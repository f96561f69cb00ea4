//! # Response Module
//!
//! The closed set of response variants a dispatch can produce, with a
//! render-once contract. [`Response::rendered`] consumes the response and
//! yields the wire form (status, content type, body bytes); the transport
//! writer in [`crate::server`] puts it on the socket.

use http::Method;
use serde_json::{json, Value};

/// A dispatch outcome, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Bare 204 status line, no body.
    NoContent,
    /// Arbitrary status with an optional JSON `{"status": ...}` envelope.
    Status { code: u16, message: Option<String> },
    /// Literal text, `text/plain`.
    Text(String),
    /// Structured value, serialized as `application/json`.
    Json(Value),
}

impl Response {
    #[must_use]
    pub fn ok() -> Self {
        Response::Status {
            code: 200,
            message: Some("OK".to_string()),
        }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Response::Status {
            code: 201,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn no_content() -> Self {
        Response::NoContent
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::Status {
            code: 400,
            message: Some(message.into()),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Response::Status {
            code: 401,
            message: Some(message.into()),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Response::Status {
            code: 403,
            message: Some(message.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Response::Status {
            code: 404,
            message: Some(message.into()),
        }
    }

    /// 405 with the fixed unsupported-verb message.
    #[must_use]
    pub fn method_not_allowed(method: &Method) -> Self {
        Response::Status {
            code: 405,
            message: Some(format!(
                "Endpoint does not support {} method",
                method.as_str().to_ascii_uppercase()
            )),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Response::Status {
            code: 500,
            message: Some(message.into()),
        }
    }

    /// HTTP status this response renders with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Response::NoContent => 204,
            Response::Status { code, .. } => *code,
            Response::Text(_) | Response::Json(_) => 200,
        }
    }

    /// Render to wire form. Consumes the response: a response is rendered at
    /// most once.
    #[must_use]
    pub fn rendered(self) -> Rendered {
        match self {
            Response::NoContent => Rendered {
                status: 204,
                content_type: None,
                body: None,
            },
            Response::Status { code, message } => Rendered {
                status: code,
                content_type: Some("application/json"),
                body: message.map(|m| json!({ "status": m }).to_string().into_bytes()),
            },
            Response::Text(text) => Rendered {
                status: 200,
                content_type: Some("text/plain"),
                body: Some(text.into_bytes()),
            },
            Response::Json(value) => Rendered {
                status: 200,
                content_type: Some("application/json"),
                body: Some(value.to_string().into_bytes()),
            },
        }
    }
}

/// Wire form of a [`Response`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Option<Vec<u8>>,
}
