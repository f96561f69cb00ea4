use super::args::{ArgValue, DefaultValue};
use crate::response::Response;

/// The closed set of primitive route-parameter types. Structured or
/// list-typed route parameters are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
}

/// Convert one untyped route parameter into a typed argument.
///
/// Precedence, in this exact order: declared default wins over nullability,
/// required-error beats nullable-null, then the cast. An empty string is
/// indistinguishable from an absent parameter.
///
/// Booleans cast via membership in {"1", "true"}, case-sensitive; anything
/// else is false. Integers and floats parse strictly: a malformed numeric
/// value is rejected with a 400 rather than coerced to zero.
pub(crate) fn coerce(
    raw: Option<&str>,
    name: &str,
    ty: Primitive,
    nullable: bool,
    default: Option<&DefaultValue>,
) -> Result<ArgValue, Response> {
    let value = raw.unwrap_or("");

    if value.is_empty() {
        if let Some(default) = default {
            return Ok(default.to_arg());
        }
        if !nullable {
            return Err(Response::bad_request(format!(
                "Missing required parameter {name}"
            )));
        }
        return Ok(ArgValue::Null);
    }

    match ty {
        Primitive::Str => Ok(ArgValue::Str(value.to_string())),
        Primitive::Int => value
            .parse::<i64>()
            .map(ArgValue::Int)
            .map_err(|_| invalid_value(name)),
        Primitive::Float => value
            .parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|_| invalid_value(name)),
        Primitive::Bool => Ok(ArgValue::Bool(matches!(value, "1" | "true"))),
    }
}

fn invalid_value(name: &str) -> Response {
    Response::bad_request(format!("Invalid value for parameter {name}"))
}
