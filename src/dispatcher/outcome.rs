use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::args::ArityError;
use crate::response::Response;

/// What a handler produced on success.
///
/// Scalars render as text, composite values as JSON, `None` as 204, and a
/// ready-made [`Response`] passes through untouched.
#[derive(Debug)]
pub enum ActionResult {
    Response(Response),
    Text(String),
    Json(Value),
    None,
}

impl ActionResult {
    /// Serialize any value into a structured result.
    pub fn json<T: Serialize>(value: &T) -> Result<ActionResult, HandlerError> {
        let value = serde_json::to_value(value)
            .map_err(|err| HandlerError::Unexpected(anyhow::Error::new(err)))?;
        Ok(ActionResult::Json(value))
    }
}

impl From<Response> for ActionResult {
    fn from(response: Response) -> Self {
        ActionResult::Response(response)
    }
}

impl From<String> for ActionResult {
    fn from(text: String) -> Self {
        ActionResult::Text(text)
    }
}

impl From<&str> for ActionResult {
    fn from(text: &str) -> Self {
        ActionResult::Text(text.to_string())
    }
}

impl From<i64> for ActionResult {
    fn from(value: i64) -> Self {
        ActionResult::Text(value.to_string())
    }
}

impl From<f64> for ActionResult {
    fn from(value: f64) -> Self {
        ActionResult::Text(value.to_string())
    }
}

impl From<bool> for ActionResult {
    fn from(value: bool) -> Self {
        ActionResult::Text(value.to_string())
    }
}

impl From<Value> for ActionResult {
    fn from(value: Value) -> Self {
        ActionResult::Json(value)
    }
}

impl From<()> for ActionResult {
    fn from(_: ()) -> Self {
        ActionResult::None
    }
}

/// Failure raised by a handler (or its binding), consumed only by the
/// dispatcher. Each kind maps to a fixed status code; only domain and
/// unexpected failures are logged.
#[derive(Debug)]
pub enum HandlerError {
    /// Invocation could not resolve its arguments.
    Arity(ArityError),
    /// Authentication required; maps to 401.
    Unauthenticated(String),
    /// Authorization insufficient; maps to 403.
    Forbidden(String),
    /// Resource not found; maps to 404.
    NotFound(String),
    /// Recognized domain-logic failure; logged, message surfaced at 500.
    Domain(String),
    /// Anything else; logged with full detail, generic 500 to the client.
    Unexpected(anyhow::Error),
}

impl HandlerError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        HandlerError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HandlerError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HandlerError::NotFound(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        HandlerError::Domain(message.into())
    }
}

impl From<ArityError> for HandlerError {
    fn from(err: ArityError) -> Self {
        HandlerError::Arity(err)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        HandlerError::Unexpected(err)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Arity(err) => write!(f, "{err}"),
            HandlerError::Unauthenticated(msg)
            | HandlerError::Forbidden(msg)
            | HandlerError::NotFound(msg)
            | HandlerError::Domain(msg) => write!(f, "{msg}"),
            HandlerError::Unexpected(err) => write!(f, "{err}"),
        }
    }
}

/// Return type of every registered handler.
pub type HandlerResult = Result<ActionResult, HandlerError>;
