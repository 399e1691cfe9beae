//! Operand validation and typed access for a single instruction.

use ippcode_common::{Argument, Instruction, Opcode, Slot, VarRef};

use crate::error::RuntimeError;

/// The operands of an instruction whose arity and slot kinds have been checked.
pub(crate) struct Operands<'i> {
    instr: &'i Instruction,
    opcode: Opcode,
}

impl<'i> Operands<'i> {
    /// Check arity and the kind of every non-symbol slot.
    ///
    /// Symbol slots accept any argument here. A label or type name used as
    /// a value is rejected when it is resolved.
    pub fn check(instr: &'i Instruction, opcode: Opcode) -> Result<Self, RuntimeError> {
        let signature = opcode.signature();
        if instr.args.len() != signature.len() {
            return Err(RuntimeError::ArityMismatch {
                at: instr.order,
                opcode: opcode.mnemonic(),
                expected: signature.len(),
                found: instr.args.len(),
            });
        }

        for (i, (slot, arg)) in signature.iter().zip(&instr.args).enumerate() {
            let fits = match slot {
                Slot::Var => matches!(arg, Argument::Var(_)),
                Slot::Label => matches!(arg, Argument::Label(_)),
                Slot::Type => matches!(arg, Argument::Type(_)),
                Slot::Symb => true,
            };
            if !fits {
                return Err(RuntimeError::InvalidOperand {
                    at: instr.order,
                    opcode: opcode.mnemonic(),
                    slot: i + 1,
                });
            }
        }

        Ok(Self { instr, opcode })
    }

    pub fn at(&self) -> u32 {
        self.instr.order
    }

    pub fn name(&self) -> &'static str {
        self.opcode.mnemonic()
    }

    pub fn type_mismatch(&self) -> RuntimeError {
        RuntimeError::TypeMismatch {
            at: self.at(),
            opcode: self.name(),
        }
    }

    fn invalid(&self, slot: usize) -> RuntimeError {
        RuntimeError::InvalidOperand {
            at: self.at(),
            opcode: self.name(),
            slot: slot + 1,
        }
    }

    /// The raw argument in `slot` (zero-based).
    pub fn arg(&self, slot: usize) -> Result<&'i Argument, RuntimeError> {
        self.instr.args.get(slot).ok_or_else(|| self.invalid(slot))
    }

    pub fn var(&self, slot: usize) -> Result<&'i VarRef, RuntimeError> {
        match self.arg(slot)? {
            Argument::Var(var) => Ok(var),
            _ => Err(self.invalid(slot)),
        }
    }

    pub fn label(&self, slot: usize) -> Result<&'i str, RuntimeError> {
        match self.arg(slot)? {
            Argument::Label(name) => Ok(name),
            _ => Err(self.invalid(slot)),
        }
    }

    pub fn type_name(&self, slot: usize) -> Result<&'i str, RuntimeError> {
        match self.arg(slot)? {
            Argument::Type(name) => Ok(name),
            _ => Err(self.invalid(slot)),
        }
    }
}
