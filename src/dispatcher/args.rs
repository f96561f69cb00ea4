use std::any::Any;
use std::fmt;

/// A single bound argument produced by the binding step.
pub enum ArgValue {
    /// Deliberately left unbound (unsupported parameter kinds). Consuming it
    /// fails with an arity error at invocation time.
    Unbound,
    /// Nullable parameter with nothing to bind.
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Decoded body target instance.
    Body(Box<dyn Any + Send>),
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Unbound => write!(f, "Unbound"),
            ArgValue::Null => write!(f, "Null"),
            ArgValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            ArgValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            ArgValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            ArgValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            ArgValue::Body(_) => write!(f, "Body(..)"),
        }
    }
}

/// Declared default for a primitive route parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl DefaultValue {
    pub(crate) fn to_arg(&self) -> ArgValue {
        match self {
            DefaultValue::Str(v) => ArgValue::Str(v.clone()),
            DefaultValue::Int(v) => ArgValue::Int(*v),
            DefaultValue::Float(v) => ArgValue::Float(*v),
            DefaultValue::Bool(v) => ArgValue::Bool(*v),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(v: &str) -> Self {
        DefaultValue::Str(v.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(v: String) -> Self {
        DefaultValue::Str(v)
    }
}

impl From<i64> for DefaultValue {
    fn from(v: i64) -> Self {
        DefaultValue::Int(v)
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        DefaultValue::Float(v)
    }
}

impl From<bool> for DefaultValue {
    fn from(v: bool) -> Self {
        DefaultValue::Bool(v)
    }
}

/// A handler consumed an argument its binding never produced: position
/// exhausted, slot left unbound, or kind mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityError {
    /// Zero-based position of the offending argument.
    pub position: usize,
    /// What the handler asked for.
    pub expected: &'static str,
}

impl fmt::Display for ArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot resolve argument {} as {}",
            self.position, self.expected
        )
    }
}

impl std::error::Error for ArityError {}

/// Ordered bound arguments, consumed positionally exactly once.
///
/// Handlers take values in their declared parameter order. The `take_*`
/// accessors move values out; a mismatch between what the handler takes and
/// what binding produced is an [`ArityError`], which the dispatcher maps to
/// a 500.
pub struct Args {
    values: std::vec::IntoIter<ArgValue>,
    position: usize,
}

impl Args {
    pub(crate) fn new(values: Vec<ArgValue>) -> Self {
        Args {
            values: values.into_iter(),
            position: 0,
        }
    }

    fn next_value(&mut self, expected: &'static str) -> Result<ArgValue, ArityError> {
        let position = self.position;
        self.position += 1;
        match self.values.next() {
            Some(ArgValue::Unbound) | None => Err(ArityError { position, expected }),
            Some(value) => Ok(value),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ArityError {
        ArityError {
            position: self.position - 1,
            expected,
        }
    }

    pub fn take_str(&mut self) -> Result<String, ArityError> {
        match self.next_value("string")? {
            ArgValue::Str(v) => Ok(v),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn take_opt_str(&mut self) -> Result<Option<String>, ArityError> {
        match self.next_value("string")? {
            ArgValue::Str(v) => Ok(Some(v)),
            ArgValue::Null => Ok(None),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn take_int(&mut self) -> Result<i64, ArityError> {
        match self.next_value("integer")? {
            ArgValue::Int(v) => Ok(v),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn take_opt_int(&mut self) -> Result<Option<i64>, ArityError> {
        match self.next_value("integer")? {
            ArgValue::Int(v) => Ok(Some(v)),
            ArgValue::Null => Ok(None),
            _ => Err(self.mismatch("integer")),
        }
    }

    pub fn take_float(&mut self) -> Result<f64, ArityError> {
        match self.next_value("float")? {
            ArgValue::Float(v) => Ok(v),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn take_opt_float(&mut self) -> Result<Option<f64>, ArityError> {
        match self.next_value("float")? {
            ArgValue::Float(v) => Ok(Some(v)),
            ArgValue::Null => Ok(None),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn take_bool(&mut self) -> Result<bool, ArityError> {
        match self.next_value("boolean")? {
            ArgValue::Bool(v) => Ok(v),
            _ => Err(self.mismatch("boolean")),
        }
    }

    pub fn take_opt_bool(&mut self) -> Result<Option<bool>, ArityError> {
        match self.next_value("boolean")? {
            ArgValue::Bool(v) => Ok(Some(v)),
            ArgValue::Null => Ok(None),
            _ => Err(self.mismatch("boolean")),
        }
    }

    /// Take a decoded body target instance.
    pub fn take_body<T: 'static>(&mut self) -> Result<T, ArityError> {
        match self.next_value("body")? {
            ArgValue::Body(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(self.mismatch("body")),
            },
            _ => Err(self.mismatch("body")),
        }
    }

    /// Take an optional body target instance; `None` when the body was
    /// absent and the parameter nullable.
    pub fn take_opt_body<T: 'static>(&mut self) -> Result<Option<T>, ArityError> {
        match self.next_value("body")? {
            ArgValue::Body(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(Some(*value)),
                Err(_) => Err(self.mismatch("body")),
            },
            ArgValue::Null => Ok(None),
            _ => Err(self.mismatch("body")),
        }
    }
}
