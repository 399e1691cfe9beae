//! IPPcode24 virtual machine: executes ordered instruction streams.
//!
//! The VM is a register-free, three-address machine with:
//! - A global frame, a stack of local frames and a temporary frame
//! - A data stack for PUSHS/POPS
//! - A call stack of return positions for CALL/RETURN
//! - Pluggable input and output through the [`Input`] and [`Output`] traits
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Argument, Instruction, Opcode, Program, Value};
//! use ippcode_vm::{run, Halt, LineInput, StreamOutput};
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Write, vec![Argument::Const(Value::Int(42))], 1),
//! ]);
//!
//! let mut input = LineInput::new(&b""[..]);
//! let mut stdout = StreamOutput::new(Vec::new());
//! let mut stderr = StreamOutput::new(Vec::new());
//! let halt = run(program, &mut input, &mut stdout, &mut stderr).unwrap();
//!
//! assert_eq!(halt, Halt::Finished);
//! assert_eq!(stdout.into_inner(), b"42");
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod io;
pub mod labels;
pub mod machine;
mod operands;
pub mod ops;

pub use error::{FrameError, RuntimeError};
pub use frames::{Frame, FrameStore, TemporaryFrame, Variable};
pub use io::{Input, LineInput, Output, StreamOutput};
pub use labels::LabelIndex;
pub use machine::{Halt, VM};

use ippcode_common::Program;

/// Execute a program and report how it ended.
///
/// The program is ordered by order number first, then run from its first
/// instruction until it runs off the end or executes EXIT.
///
/// # Errors
///
/// Returns [`RuntimeError`] for invalid ordering and for every runtime
/// failure. [`RuntimeError::exit_code`] gives the matching process status.
pub fn run<'a>(
    program: Program,
    input: &'a mut dyn Input,
    stdout: &'a mut dyn Output,
    stderr: &'a mut dyn Output,
) -> Result<Halt, RuntimeError> {
    let mut vm = VM::new(program, input, stdout, stderr);
    vm.execute()
}
