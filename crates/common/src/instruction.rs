//! A single IPPcode24 instruction: opcode, operands and order number.

use std::fmt;

use crate::argument::Argument;
use crate::opcode::Opcode;

/// One instruction of a program.
///
/// The mnemonic is kept as written (upper-cased) so that an instruction
/// with an opcode outside the instruction set can still be carried to the
/// VM, which skips it with a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Upper-cased mnemonic.
    pub mnemonic: String,
    /// The decoded opcode, `None` if the mnemonic is not recognized.
    pub opcode: Option<Opcode>,
    /// Operands, in slot order.
    pub args: Vec<Argument>,
    /// Declared position in the program. Unique and at least 1.
    pub order: u32,
}

impl Instruction {
    /// Create an instruction for a known opcode.
    pub fn new(opcode: Opcode, args: Vec<Argument>, order: u32) -> Self {
        Self {
            mnemonic: opcode.mnemonic().to_string(),
            opcode: Some(opcode),
            args,
            order,
        }
    }

    /// Create an instruction from a raw mnemonic in any letter case.
    pub fn from_mnemonic(mnemonic: &str, args: Vec<Argument>, order: u32) -> Self {
        let mnemonic = mnemonic.trim().to_uppercase();
        Self {
            opcode: Opcode::from_mnemonic(&mnemonic),
            mnemonic,
            args,
            order,
        }
    }
}

/// Formats the instruction as one line of source.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
