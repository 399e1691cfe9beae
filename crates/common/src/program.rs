//! Program representation: an ordered sequence of instructions.
//!
//! Loaders may hand over instructions in any order. [`Program::ordered`]
//! sorts them by their declared order number and rejects missing,
//! zero or duplicate numbers before anything executes.

use std::collections::HashSet;

use crate::argument::Argument;
use crate::error::ProgramError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// An IPPcode24 program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Sort by order number and validate the numbering.
    ///
    /// Every order number must be at least 1 and unique across the program.
    /// Gaps are allowed.
    pub fn ordered(mut self) -> Result<Program, ProgramError> {
        let mut seen = HashSet::with_capacity(self.instructions.len());
        for instr in &self.instructions {
            if instr.order == 0 {
                return Err(ProgramError::InvalidOrder(instr.order));
            }
            if !seen.insert(instr.order) {
                return Err(ProgramError::DuplicateOrder(instr.order));
            }
        }

        self.instructions.sort_by_key(|instr| instr.order);
        Ok(self)
    }

    /// Positions of all LABEL instructions, paired with the label name.
    ///
    /// The position is the index right after the LABEL instruction.
    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.instructions
            .iter()
            .enumerate()
            .filter(|(_, instr)| instr.opcode == Some(Opcode::Label))
            .filter_map(|(i, instr)| match instr.args.first() {
                Some(Argument::Label(name)) => Some((name.as_str(), i + 1)),
                _ => None,
            })
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
