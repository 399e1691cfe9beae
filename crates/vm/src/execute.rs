//! Main execution loop and opcode dispatch for the IPPcode24 VM.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io;
use std::rc::Rc;

use ippcode_common::{escape, Opcode, Program, TypeTag, Value};

use crate::error::RuntimeError;
use crate::io::Output;
use crate::labels::LabelIndex;
use crate::machine::{Halt, VM};
use crate::operands::Operands;
use crate::ops;

/// Which output stream a value is printed to.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl<'a> VM<'a> {
    /// Order the program, index its labels and run it to completion.
    ///
    /// Every call starts from empty frames and stacks, so a VM can be run
    /// more than once.
    pub fn execute(&mut self) -> Result<Halt, RuntimeError> {
        self.reset();
        let program = Program::clone(&self.program).ordered()?;
        self.labels = LabelIndex::build(&program);
        self.program = Rc::new(program);
        tracing::debug!(
            instructions = self.program.len(),
            labels = self.labels.len(),
            "run started"
        );

        let outcome = self.run_loop();
        let flushed = self.flush();
        let halt = outcome?;
        flushed?;

        tracing::debug!(steps = self.steps, ?halt, "run finished");
        Ok(halt)
    }

    fn run_loop(&mut self) -> Result<Halt, RuntimeError> {
        let program = Rc::clone(&self.program);
        while let Some(instr) = program.instructions.get(self.pc) {
            self.pc += 1;
            self.at = instr.order;

            let Some(opcode) = instr.opcode else {
                tracing::warn!(
                    mnemonic = %instr.mnemonic,
                    order = instr.order,
                    "skipping unknown opcode"
                );
                continue;
            };

            self.steps += 1;
            tracing::trace!(order = instr.order, %instr, "dispatch");
            let args = Operands::check(instr, opcode)?;

            match opcode {
                // Frames and calls
                Opcode::Move => self.exec_move(&args)?,
                Opcode::CreateFrame => self.frames.create_temporary(),
                Opcode::PushFrame => self.exec_push_frame()?,
                Opcode::PopFrame => self.exec_pop_frame()?,
                Opcode::Defvar => self.exec_defvar(&args)?,
                Opcode::Call => self.exec_call(&args)?,
                Opcode::Return => self.exec_return()?,

                // Data stack
                Opcode::Pushs => self.exec_pushs(&args)?,
                Opcode::Pops => self.exec_pops(&args)?,

                // Arithmetic, relational, boolean
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Idiv => {
                    self.exec_binary(&args, |at, a, b| ops::arithmetic(at, opcode, a, b))?
                }
                Opcode::Lt => self.exec_binary(&args, |at, a, b| {
                    ops::compare(at, opcode, a, b).map(|o| Value::Bool(o == Ordering::Less))
                })?,
                Opcode::Gt => self.exec_binary(&args, |at, a, b| {
                    ops::compare(at, opcode, a, b).map(|o| Value::Bool(o == Ordering::Greater))
                })?,
                Opcode::Eq => {
                    self.exec_binary(&args, |at, a, b| ops::equals(at, a, b).map(Value::Bool))?
                }
                Opcode::And | Opcode::Or => {
                    self.exec_binary(&args, |at, a, b| ops::logic(at, opcode, a, b))?
                }
                Opcode::Not => self.exec_unary(&args, ops::not)?,

                // Conversions and strings
                Opcode::Int2Char => self.exec_unary(&args, ops::int2char)?,
                Opcode::Stri2Int => self.exec_binary(&args, ops::stri2int)?,
                Opcode::Concat => self.exec_binary(&args, ops::concat)?,
                Opcode::Strlen => self.exec_unary(&args, ops::strlen)?,
                Opcode::Getchar => self.exec_binary(&args, ops::getchar)?,
                Opcode::Setchar => self.exec_setchar(&args)?,
                Opcode::Type => self.exec_type(&args)?,

                // Input and output
                Opcode::Read => self.exec_read(&args)?,
                Opcode::Write => self.exec_print(&args, Stream::Stdout)?,

                // Control flow
                Opcode::Label => {}
                Opcode::Jump => self.pc = self.jump_target(args.label(0)?)?,
                Opcode::JumpIfEq => self.exec_conditional_jump(&args, true)?,
                Opcode::JumpIfNeq => self.exec_conditional_jump(&args, false)?,
                Opcode::Exit => return self.exec_exit(&args),

                // Debugging
                Opcode::Dprint => self.exec_print(&args, Stream::Stderr)?,
                Opcode::Break => self.exec_break(),
            }
        }

        Ok(Halt::Finished)
    }

    fn flush(&mut self) -> Result<(), RuntimeError> {
        self.stdout.flush().map_err(|e| self.output_failed(e))?;
        self.stderr.flush().map_err(|e| self.output_failed(e))
    }

    // ---- Frames and calls ----

    fn exec_move(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let value = self.symbol(args, 1)?;
        self.store(args.var(0)?, value)
    }

    fn exec_push_frame(&mut self) -> Result<(), RuntimeError> {
        self.frames.push_temporary().map_err(|e| self.memory(e))
    }

    fn exec_pop_frame(&mut self) -> Result<(), RuntimeError> {
        self.frames.pop_local().map_err(|e| self.memory(e))
    }

    fn exec_defvar(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        self.frames.define(args.var(0)?).map_err(|e| self.memory(e))
    }

    fn exec_call(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let target = self.jump_target(args.label(0)?)?;
        self.call_stack.push(self.pc);
        self.pc = target;
        Ok(())
    }

    fn exec_return(&mut self) -> Result<(), RuntimeError> {
        self.pc = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::CallStackEmpty { at: self.at })?;
        Ok(())
    }

    // ---- Data stack ----

    fn exec_pushs(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let value = self.symbol(args, 0)?;
        self.push(value);
        Ok(())
    }

    fn exec_pops(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let value = self.pop()?;
        self.store(args.var(0)?, value)
    }

    // ---- Value operations ----

    /// `dst := f(symb)`.
    fn exec_unary(
        &mut self,
        args: &Operands<'_>,
        f: impl FnOnce(u32, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let dst = args.var(0)?;
        let a = self.symbol(args, 1)?;
        let result = f(args.at(), &a)?;
        self.store(dst, result)
    }

    /// `dst := f(symb1, symb2)`.
    fn exec_binary(
        &mut self,
        args: &Operands<'_>,
        f: impl FnOnce(u32, &Value, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let dst = args.var(0)?;
        let a = self.symbol(args, 1)?;
        let b = self.symbol(args, 2)?;
        let result = f(args.at(), &a, &b)?;
        self.store(dst, result)
    }

    fn exec_setchar(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let dst = args.var(0)?;
        let current = self.frames.value(dst).cloned().map_err(|e| self.memory(e))?;
        let index = self.symbol(args, 1)?;
        let with = self.symbol(args, 2)?;
        let result = ops::setchar(args.at(), &current, &index, &with)?;
        self.store(dst, result)
    }

    fn exec_type(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let dst = args.var(0)?;
        let value = self.symbol_or_unset(args, 1)?;
        self.store(dst, ops::type_name(value.as_ref()))
    }

    // ---- Input and output ----

    fn exec_read(&mut self, args: &Operands<'_>) -> Result<(), RuntimeError> {
        let dst = args.var(0)?;
        let name = args.type_name(1)?;
        let tag = TypeTag::from_name(name)
            .filter(TypeTag::is_readable)
            .ok_or_else(|| RuntimeError::UnreadableType {
                at: self.at,
                name: name.to_string(),
            })?;

        let value = match tag {
            TypeTag::Int => Value::Int(self.input.read_int()),
            TypeTag::Bool => Value::Bool(self.input.read_bool()),
            TypeTag::String => Value::from_text(&self.input.read_string()),
            TypeTag::Nil => Value::default_for(tag),
        };
        self.store(dst, value)
    }

    fn exec_print(&mut self, args: &Operands<'_>, stream: Stream) -> Result<(), RuntimeError> {
        let value = self.symbol(args, 0)?;
        let written = match stream {
            Stream::Stdout => write_value(&mut *self.stdout, &value),
            Stream::Stderr => write_value(&mut *self.stderr, &value),
        };
        written.map_err(|e| self.output_failed(e))
    }

    // ---- Control flow ----

    /// JUMPIFEQ / JUMPIFNEQ. The label must exist even when the jump is not taken.
    fn exec_conditional_jump(&mut self, args: &Operands<'_>, on_equal: bool) -> Result<(), RuntimeError> {
        let target = self.jump_target(args.label(0)?)?;
        let a = self.symbol(args, 1)?;
        let b = self.symbol(args, 2)?;
        let opcode = if on_equal {
            Opcode::JumpIfEq
        } else {
            Opcode::JumpIfNeq
        };
        if ops::jump_equals(args.at(), opcode, &a, &b)? == on_equal {
            self.pc = target;
        }
        Ok(())
    }

    fn exec_exit(&mut self, args: &Operands<'_>) -> Result<Halt, RuntimeError> {
        let value = self.symbol(args, 0)?;
        let code = ops::exit_code(args.at(), &value)?;
        Ok(Halt::Exit(code))
    }

    // ---- Debugging ----

    fn exec_break(&mut self) {
        let dump = self.dump();
        if let Err(e) = self.stderr.write_string(&dump) {
            tracing::warn!(error = %e, "BREAK dump could not be written");
        }
    }

    /// Human-readable snapshot of the interpreter state.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "BREAK at instruction {} (position {})", self.at, self.pc);
        let _ = writeln!(out, "executed: {}", self.steps);
        let _ = write!(out, "{}", self.frames);

        let stack: Vec<String> = self.data_stack.iter().map(Value::to_string).collect();
        let _ = writeln!(out, "data stack: [{}]", stack.join(", "));
        let calls: Vec<String> = self.call_stack.iter().map(usize::to_string).collect();
        let _ = writeln!(out, "call stack: [{}]", calls.join(", "));
        let _ = writeln!(out, "labels: {}", self.labels.len());
        out
    }
}

/// Print a value in output form: strings decoded, nil as nothing.
fn write_value<O: Output + ?Sized>(out: &mut O, value: &Value) -> io::Result<()> {
    match value {
        Value::Int(n) => out.write_int(*n),
        Value::Bool(b) => out.write_bool(*b),
        Value::Str(s) => out.write_string(&escape::decode(s)),
        Value::Nil => out.write_string(""),
    }
}
