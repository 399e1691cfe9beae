//! Runtime value representation for the IPPcode24 VM.
//!
//! Values are what variables hold and what lives on the data stack.

use std::fmt;

use crate::escape;
use crate::type_tag::TypeTag;

/// Runtime value representation.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// String in escaped form (see [`crate::escape`]).
    Str(String),
    /// The nil value. Distinct from an uninitialized variable.
    Nil,
}

// Strings compare by the characters they denote, so `a` and `\097` are
// the same string. Everything else is plain structural equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b || escape::chars(a) == escape::chars(b),
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::String,
            Value::Nil => TypeTag::Nil,
        }
    }

    /// The value a READ of type `tag` yields when input is missing or malformed.
    pub fn default_for(tag: TypeTag) -> Value {
        match tag {
            TypeTag::Int => Value::Int(0),
            TypeTag::Bool => Value::Bool(false),
            TypeTag::String => Value::Str(String::new()),
            TypeTag::Nil => Value::Nil,
        }
    }

    /// Build a string value from plain (unescaped) text.
    pub fn from_text(text: &str) -> Value {
        Value::Str(escape::escape(text))
    }
}

/// Formats the value as a source literal, e.g. `int@5` or `string@a\032b`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "int@{n}"),
            Value::Bool(b) => write!(f, "bool@{b}"),
            Value::Str(s) => write!(f, "string@{s}"),
            Value::Nil => f.write_str("nil@nil"),
        }
    }
}
