//! VM state: program, frames, labels, stacks and I/O collaborators.

use std::io;
use std::rc::Rc;

use ippcode_common::{Argument, Program, Value, VarRef};

use crate::error::{FrameError, RuntimeError};
use crate::frames::FrameStore;
use crate::io::{Input, Output};
use crate::labels::LabelIndex;
use crate::operands::Operands;

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Execution ran past the last instruction.
    Finished,
    /// EXIT with a code in 0..=9.
    Exit(u8),
}

impl Halt {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Halt::Finished => 0,
            Halt::Exit(code) => i32::from(*code),
        }
    }
}

/// The IPPcode24 virtual machine.
///
/// One value holds all state of a single run. The I/O collaborators are
/// borrowed so callers can inspect captured output afterwards.
pub struct VM<'a> {
    /// The program being executed, ordered once execution starts.
    /// Shared so the dispatch loop can borrow instructions while mutating state.
    pub(crate) program: Rc<Program>,
    /// Global, local and temporary frames.
    pub(crate) frames: FrameStore,
    /// Jump targets.
    pub(crate) labels: LabelIndex,
    /// Values pushed by PUSHS.
    pub(crate) data_stack: Vec<Value>,
    /// Return positions pushed by CALL.
    pub(crate) call_stack: Vec<usize>,
    /// Position of the next instruction.
    pub(crate) pc: usize,
    /// Order number of the instruction being executed.
    pub(crate) at: u32,
    /// Number of instructions executed so far.
    pub(crate) steps: u64,
    pub(crate) input: &'a mut dyn Input,
    pub(crate) stdout: &'a mut dyn Output,
    pub(crate) stderr: &'a mut dyn Output,
}

impl<'a> VM<'a> {
    /// Create a VM for `program`. WRITE goes to `stdout`, DPRINT and BREAK to `stderr`.
    pub fn new(
        program: Program,
        input: &'a mut dyn Input,
        stdout: &'a mut dyn Output,
        stderr: &'a mut dyn Output,
    ) -> Self {
        Self {
            program: Rc::new(program),
            frames: FrameStore::new(),
            labels: LabelIndex::new(),
            data_stack: Vec::new(),
            call_stack: Vec::new(),
            pc: 0,
            at: 0,
            steps: 0,
            input,
            stdout,
            stderr,
        }
    }

    /// Discard all state left by a previous run.
    pub(crate) fn reset(&mut self) {
        self.frames = FrameStore::new();
        self.labels = LabelIndex::new();
        self.data_stack.clear();
        self.call_stack.clear();
        self.pc = 0;
        self.at = 0;
        self.steps = 0;
    }

    /// Read-only view of the frames, for inspection after a run.
    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    /// Read-only view of the data stack, bottom first.
    pub fn data_stack(&self) -> &[Value] {
        &self.data_stack
    }

    pub(crate) fn memory(&self, source: FrameError) -> RuntimeError {
        RuntimeError::Memory {
            at: self.at,
            source,
        }
    }

    pub(crate) fn output_failed(&self, e: io::Error) -> RuntimeError {
        RuntimeError::Output {
            at: self.at,
            message: e.to_string(),
        }
    }

    /// Resolve the symbol operand in `slot` to a value.
    ///
    /// Variables are looked up at every use and must be initialized.
    pub(crate) fn symbol(&self, ops: &Operands<'_>, slot: usize) -> Result<Value, RuntimeError> {
        match ops.arg(slot)? {
            Argument::Const(value) => Ok(value.clone()),
            Argument::Var(var) => self
                .frames
                .value(var)
                .cloned()
                .map_err(|e| self.memory(e)),
            Argument::Label(_) | Argument::Type(_) => Err(ops.type_mismatch()),
        }
    }

    /// Like [`VM::symbol`], but an uninitialized variable yields `None`.
    pub(crate) fn symbol_or_unset(
        &self,
        ops: &Operands<'_>,
        slot: usize,
    ) -> Result<Option<Value>, RuntimeError> {
        match ops.arg(slot)? {
            Argument::Const(value) => Ok(Some(value.clone())),
            Argument::Var(var) => self
                .frames
                .read(var)
                .map(|v| v.value.clone())
                .map_err(|e| self.memory(e)),
            Argument::Label(_) | Argument::Type(_) => Err(ops.type_mismatch()),
        }
    }

    /// Assign to an existing variable.
    pub(crate) fn store(&mut self, var: &VarRef, value: Value) -> Result<(), RuntimeError> {
        self.frames.write(var, value).map_err(|e| self.memory(e))
    }

    /// Position a label refers to.
    pub(crate) fn jump_target(&self, label: &str) -> Result<usize, RuntimeError> {
        self.labels
            .resolve(label)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: self.at,
                label: label.to_string(),
            })
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.data_stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.data_stack
            .pop()
            .ok_or(RuntimeError::DataStackEmpty { at: self.at })
    }
}
