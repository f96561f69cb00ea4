use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Why a request body failed to decode.
///
/// Produced by [`decode_body`] and consumed only by the dispatcher, which
/// renders the matching 400 response. Never escapes to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Body absent or empty but the target is required.
    Missing,
    /// Payload is not valid JSON.
    Malformed,
    /// JSON parsed but the target type rejected it.
    Validation(String),
}

/// Mapping failure reported by a body target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// One or more field-level validation messages.
    Validation(Vec<String>),
    /// Generic argument/domain error, surfaced verbatim.
    Invalid(String),
}

impl MapError {
    pub fn invalid(message: impl Into<String>) -> Self {
        MapError::Invalid(message.into())
    }

    /// Client-facing detail text.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            MapError::Validation(messages) => messages.join("; "),
            MapError::Invalid(message) => message.clone(),
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for MapError {}

/// Capability trait for body target types.
///
/// A decoded JSON value is handed to `map`, which owns field-level
/// validation and construction of the typed instance. The dispatcher depends
/// only on this contract, never on concrete target types.
pub trait RequestBody: Sized + Send + 'static {
    fn map(value: Value) -> Result<Self, MapError>;
}

/// Auto-mapping body targets: serde deserialization plus an optional
/// post-deserialization rules hook.
///
/// Implementing this marker gives a type a [`RequestBody`] impl for free:
///
/// ```
/// use actiondispatch::request::body::{AutoMappingBody, MapError};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct NewUser {
///     name: String,
///     age: i64,
/// }
///
/// impl AutoMappingBody for NewUser {
///     fn rules(&self) -> Result<(), MapError> {
///         if self.age < 25 || self.age > 50 {
///             return Err(MapError::Validation(vec![
///                 "age must be between 25 and 50".to_string(),
///             ]));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait AutoMappingBody: DeserializeOwned + Send + 'static {
    /// Custom validation rules applied after deserialization.
    fn rules(&self) -> Result<(), MapError> {
        Ok(())
    }
}

impl<T: AutoMappingBody> RequestBody for T {
    fn map(value: Value) -> Result<Self, MapError> {
        let mapped: T = serde_json::from_value(value)
            .map_err(|err| MapError::Validation(vec![err.to_string()]))?;
        mapped.rules()?;
        Ok(mapped)
    }
}

/// Decode a raw payload into a typed body value.
///
/// Absent and empty payloads are treated identically: `Ok(None)` when the
/// target is nullable, [`DecodeError::Missing`] otherwise. Anything else is
/// parsed as JSON and mapped through [`RequestBody::map`].
pub fn decode_body<T: RequestBody>(
    raw: Option<&[u8]>,
    nullable: bool,
) -> Result<Option<T>, DecodeError> {
    let raw = match raw {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ if nullable => return Ok(None),
        _ => return Err(DecodeError::Missing),
    };

    let value: Value = serde_json::from_slice(raw).map_err(|_| DecodeError::Malformed)?;
    let mapped = T::map(value).map_err(|err| DecodeError::Validation(err.detail()))?;
    Ok(Some(mapped))
}
