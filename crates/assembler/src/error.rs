//! Error types for the IPPcode24 assembler.

use ippcode_common::ProgramError;
use thiserror::Error;

/// Errors produced while assembling source text.
///
/// Every variant carries the 1-based source line it was found on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An instruction appeared before the `.IPPcode24` header.
    #[error("line {line}: missing .IPPcode24 header")]
    MissingHeader { line: usize },

    /// The header appeared a second time.
    #[error("line {line}: duplicate .IPPcode24 header")]
    DuplicateHeader { line: usize },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode got the wrong number of operands.
    #[error("line {line}: {opcode} expects {expected} operand(s), got {found}")]
    WrongOperandCount {
        line: usize,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// An operand does not fit its slot (e.g. a literal where a variable is required).
    #[error("line {line}: expected {expected}, found '{token}'")]
    InvalidOperand {
        line: usize,
        expected: &'static str,
        token: String,
    },

    /// An integer literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A string literal contains a backslash not followed by three digits.
    #[error("line {line}: invalid escape sequence in '{token}'")]
    InvalidEscape { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
}

impl AsmError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AsmError::MissingHeader { .. } => 21,
            AsmError::UnknownOpcode { .. } => 22,
            _ => 23,
        }
    }

    /// Source line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::MissingHeader { line }
            | AsmError::DuplicateHeader { line }
            | AsmError::UnknownOpcode { line, .. }
            | AsmError::WrongOperandCount { line, .. }
            | AsmError::InvalidOperand { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::InvalidEscape { line, .. }
            | AsmError::UnexpectedToken { line, .. } => *line,
        }
    }
}

/// Errors produced while loading an XML program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The root element is not `<program language="IPPcode24">`.
    #[error("root element must be <program language=\"IPPcode24\">")]
    NotAProgram,

    /// An `<instruction>` element lacks a required attribute.
    #[error("instruction #{index}: missing '{attribute}' attribute")]
    MissingAttribute {
        index: usize,
        attribute: &'static str,
    },

    /// An operand element could not be turned into an argument.
    #[error("instruction {order}: {source}")]
    Argument { order: u32, source: ProgramError },
}

impl XmlError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            XmlError::Malformed(_) => 31,
            XmlError::NotAProgram | XmlError::MissingAttribute { .. } => 32,
            XmlError::Argument { source, .. } => source.exit_code(),
        }
    }
}
