//! IPPcode24 common types.
//!
//! This crate provides the value model shared by the loader and the VM:
//!
//! - [`Value`]: runtime values (`int`, `bool`, `string`, `nil`)
//! - [`TypeTag`]: the dynamic type of a value
//! - [`Argument`]: an instruction operand (literal, variable, label, type)
//! - [`Opcode`]: all 35 opcodes of the instruction set
//! - [`Instruction`]: opcode, operands and order number
//! - [`Program`]: a sequence of instructions, ordered by order number
//! - [`ProgramError`]: errors from building or ordering a program
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod argument;
pub mod error;
pub mod escape;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use argument::{ArgKind, Argument, FrameKind, VarRef};
pub use error::ProgramError;
pub use instruction::Instruction;
pub use opcode::{Opcode, Slot};
pub use program::Program;
pub use type_tag::TypeTag;
pub use value::Value;
