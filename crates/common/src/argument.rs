//! Instruction operands: literals, variable references, labels and type names.
//!
//! An [`Argument`] is the syntactic form of an operand. Variable references
//! are never resolved here; the VM looks them up every time they are used.

use std::fmt;

use crate::error::ProgramError;
use crate::value::Value;

/// The three variable scopes, addressed by a two-letter prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `GF`: the single global frame.
    Global,
    /// `LF`: the top of the local-frame stack.
    Local,
    /// `TF`: the temporary frame.
    Temporary,
}

impl FrameKind {
    /// Two-letter prefix used in source (`GF`, `LF`, `TF`).
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }

    /// Look up a frame by its prefix. Matching is exact.
    pub fn from_prefix(prefix: &str) -> Option<FrameKind> {
        match prefix {
            "GF" => Some(FrameKind::Global),
            "LF" => Some(FrameKind::Local),
            "TF" => Some(FrameKind::Temporary),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A reference to a variable: which frame, and which name inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameKind,
    pub name: String,
}

impl VarRef {
    pub fn new(frame: FrameKind, name: impl Into<String>) -> Self {
        Self {
            frame,
            name: name.into(),
        }
    }

    /// Parse `GF@name`, `LF@name` or `TF@name`.
    pub fn parse(text: &str) -> Result<VarRef, ProgramError> {
        let malformed = || ProgramError::MalformedVariable(text.to_string());
        let (prefix, name) = text.split_once('@').ok_or_else(malformed)?;
        let frame = FrameKind::from_prefix(prefix).ok_or_else(malformed)?;
        if name.is_empty() {
            return Err(malformed());
        }
        Ok(VarRef::new(frame, name))
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame, self.name)
    }
}

/// The operand tags an instruction slot may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Int,
    Bool,
    String,
    Nil,
    Label,
    Type,
    Var,
}

/// All operand tags, in definition order.
pub const ALL_ARG_KINDS: [ArgKind; 7] = [
    ArgKind::Int,
    ArgKind::Bool,
    ArgKind::String,
    ArgKind::Nil,
    ArgKind::Label,
    ArgKind::Type,
    ArgKind::Var,
];

impl ArgKind {
    /// The tag as written in the program representation.
    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::Int => "int",
            ArgKind::Bool => "bool",
            ArgKind::String => "string",
            ArgKind::Nil => "nil",
            ArgKind::Label => "label",
            ArgKind::Type => "type",
            ArgKind::Var => "var",
        }
    }

    pub fn from_name(name: &str) -> Option<ArgKind> {
        ALL_ARG_KINDS.iter().find(|k| k.name() == name).copied()
    }
}

/// One operand of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A literal constant.
    Const(Value),
    /// A variable reference, resolved at the point of use.
    Var(VarRef),
    /// A jump target name.
    Label(String),
    /// A type name (operand of READ).
    Type(String),
}

impl Argument {
    /// Build an argument from its tag and raw text.
    ///
    /// Surrounding whitespace is stripped. Integer text is coerced
    /// leniently: a leading numeric prefix is used, and text with no numeric
    /// prefix becomes zero. A boolean is `true` only for the exact text
    /// `true`.
    pub fn parse(kind: &str, text: &str) -> Result<Argument, ProgramError> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ProgramError::MissingArgumentKind);
        }
        let kind = ArgKind::from_name(kind)
            .ok_or_else(|| ProgramError::UnknownArgumentKind(kind.to_string()))?;
        let text = text.trim();

        Ok(match kind {
            ArgKind::Int => Argument::Const(Value::Int(coerce_int(text))),
            ArgKind::Bool => Argument::Const(Value::Bool(text == "true")),
            ArgKind::String => Argument::Const(Value::Str(text.to_string())),
            ArgKind::Nil => Argument::Const(Value::Nil),
            ArgKind::Label => Argument::Label(text.to_string()),
            ArgKind::Type => Argument::Type(text.to_string()),
            ArgKind::Var => Argument::Var(VarRef::parse(text)?),
        })
    }

    /// The operand tag of this argument.
    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Const(Value::Int(_)) => ArgKind::Int,
            Argument::Const(Value::Bool(_)) => ArgKind::Bool,
            Argument::Const(Value::Str(_)) => ArgKind::String,
            Argument::Const(Value::Nil) => ArgKind::Nil,
            Argument::Var(_) => ArgKind::Var,
            Argument::Label(_) => ArgKind::Label,
            Argument::Type(_) => ArgKind::Type,
        }
    }

    /// True for operands that denote a value (literal or variable).
    pub fn is_symbol(&self) -> bool {
        matches!(self, Argument::Const(_) | Argument::Var(_))
    }
}

/// Formats the argument the way it is written in source.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Const(value) => write!(f, "{value}"),
            Argument::Var(var) => write!(f, "{var}"),
            Argument::Label(name) | Argument::Type(name) => f.write_str(name),
        }
    }
}

/// Integer coercion with an optional sign and `0x`/`0o` radix prefix.
///
/// Parsing stops at the first character that is not a digit of the radix.
/// Values beyond the `i64` range saturate.
fn coerce_int(text: &str) -> i64 {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        Some("0o") | Some("0O") => (8, &rest[2..]),
        _ => (10, rest),
    };

    let mut magnitude: i128 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        magnitude = (magnitude * radix as i128 + d as i128).min(i64::MAX as i128 + 1);
    }

    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
