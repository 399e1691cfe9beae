//! Errors raised while building and ordering an instruction stream.

use thiserror::Error;

/// Errors that occur while constructing arguments or ordering a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// An operand slot carried no type tag at all.
    #[error("operand has no type")]
    MissingArgumentKind,

    /// An operand slot carried a tag that is not part of the instruction set.
    #[error("unknown operand type '{0}'")]
    UnknownArgumentKind(String),

    /// A `var` operand was not of the form `GF@name`, `LF@name` or `TF@name`.
    #[error("malformed variable reference '{0}'")]
    MalformedVariable(String),

    /// Order numbers start at 1.
    #[error("invalid instruction order {0} (must be at least 1)")]
    InvalidOrder(u32),

    /// Two instructions claimed the same order number.
    #[error("duplicate instruction order {0}")]
    DuplicateOrder(u32),
}

impl ProgramError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProgramError::UnknownArgumentKind(_) => 53,
            ProgramError::MissingArgumentKind
            | ProgramError::MalformedVariable(_)
            | ProgramError::InvalidOrder(_)
            | ProgramError::DuplicateOrder(_) => 32,
        }
    }
}
