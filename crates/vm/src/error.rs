//! Runtime errors for the IPPcode24 VM.
//!
//! Every error raised while an instruction executes carries the order
//! number (`at`) of that instruction. Each error maps to the process exit
//! code the interpreter terminates with.

use ippcode_common::{FrameKind, ProgramError, VarRef};
use thiserror::Error;

/// Failures of the frame store, independent of the instruction that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The addressed frame does not exist (no temporary frame, empty local stack).
    #[error("frame {0} does not exist")]
    FrameMissing(FrameKind),

    /// The variable is not defined in an existing frame.
    #[error("variable {0} is not defined")]
    VariableMissing(VarRef),

    /// DEFVAR of a name already present in the frame.
    #[error("variable {0} is already defined")]
    Redefinition(VarRef),

    /// The variable exists but has never been assigned.
    #[error("variable {0} is not initialized")]
    Uninitialized(VarRef),

    /// PUSHFRAME with no pending temporary frame.
    #[error("no temporary frame to push")]
    NothingToPush,

    /// POPFRAME with an empty local-frame stack.
    #[error("no local frame to pop")]
    NothingToPop,
}

impl FrameError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            FrameError::Redefinition(_) => 52,
            FrameError::VariableMissing(_) => 54,
            FrameError::FrameMissing(_) | FrameError::NothingToPush | FrameError::NothingToPop => {
                55
            }
            FrameError::Uninitialized(_) => 56,
        }
    }
}

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The program could not be ordered before execution started.
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// Wrong number of operands for the opcode.
    #[error("{opcode} expects {expected} operands, got {found} at instruction {at}")]
    ArityMismatch {
        at: u32,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// An operand slot holds the wrong kind of argument (e.g. a literal destination).
    #[error("operand {slot} of {opcode} has the wrong kind at instruction {at}")]
    InvalidOperand {
        at: u32,
        opcode: &'static str,
        slot: usize,
    },

    /// READ with a type other than int, bool or string.
    #[error("cannot read values of type '{name}' at instruction {at}")]
    UnreadableType { at: u32, name: String },

    /// Jump or call to a label that is not defined.
    #[error("undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: u32, label: String },

    /// Frame or variable access failed.
    #[error("{source} at instruction {at}")]
    Memory { at: u32, source: FrameError },

    /// Operand types are not accepted by the operation.
    #[error("operand type mismatch in {opcode} at instruction {at}")]
    TypeMismatch { at: u32, opcode: &'static str },

    /// POPS on an empty data stack.
    #[error("data stack is empty at instruction {at}")]
    DataStackEmpty { at: u32 },

    /// RETURN on an empty call stack.
    #[error("call stack is empty at instruction {at}")]
    CallStackEmpty { at: u32 },

    /// IDIV with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: u32 },

    /// EXIT with a code outside 0..=9.
    #[error("exit code {code} out of range 0..=9 at instruction {at}")]
    ExitCodeOutOfRange { at: u32, code: i64 },

    /// String index outside the string.
    #[error("string index {index} out of range (length {length}) at instruction {at}")]
    IndexOutOfRange { at: u32, index: i64, length: usize },

    /// SETCHAR with an empty replacement string.
    #[error("empty replacement string at instruction {at}")]
    EmptyReplacement { at: u32 },

    /// INT2CHAR with a code outside 0..=255.
    #[error("character code {code} out of range 0..=255 at instruction {at}")]
    CharCodeOutOfRange { at: u32, code: i64 },

    /// Writing to an output stream failed.
    #[error("output failed at instruction {at}: {message}")]
    Output { at: u32, message: String },
}

impl RuntimeError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::Program(e) => e.exit_code(),
            RuntimeError::ArityMismatch { .. }
            | RuntimeError::InvalidOperand { .. }
            | RuntimeError::UnreadableType { .. } => 32,
            RuntimeError::UndefinedLabel { .. } => 52,
            RuntimeError::Memory { source, .. } => source.exit_code(),
            RuntimeError::TypeMismatch { .. } => 53,
            RuntimeError::DataStackEmpty { .. } | RuntimeError::CallStackEmpty { .. } => 56,
            RuntimeError::DivisionByZero { .. } | RuntimeError::ExitCodeOutOfRange { .. } => 57,
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::EmptyReplacement { .. }
            | RuntimeError::CharCodeOutOfRange { .. } => 58,
            RuntimeError::Output { .. } => 12,
        }
    }

    /// Order number of the failing instruction, if the error happened while one ran.
    pub fn at(&self) -> Option<u32> {
        match self {
            RuntimeError::Program(_) => None,
            RuntimeError::ArityMismatch { at, .. }
            | RuntimeError::InvalidOperand { at, .. }
            | RuntimeError::UnreadableType { at, .. }
            | RuntimeError::UndefinedLabel { at, .. }
            | RuntimeError::Memory { at, .. }
            | RuntimeError::TypeMismatch { at, .. }
            | RuntimeError::DataStackEmpty { at }
            | RuntimeError::CallStackEmpty { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::ExitCodeOutOfRange { at, .. }
            | RuntimeError::IndexOutOfRange { at, .. }
            | RuntimeError::EmptyReplacement { at }
            | RuntimeError::CharCodeOutOfRange { at, .. }
            | RuntimeError::Output { at, .. } => Some(*at),
        }
    }
}
