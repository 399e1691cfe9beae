//! Disassembler: instruction stream → canonical IPPcode24 source.
//!
//! Output is the header followed by one instruction per line. No
//! indentation, no comments, no blank lines.

use ippcode_common::{escape, Argument, Instruction, Program, Value};

/// Disassemble a program into canonical source text.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::from(crate::lexer::HEADER);
    out.push('\n');
    for instr in &program.instructions {
        out.push_str(&render_instruction(instr));
        out.push('\n');
    }
    out
}

fn render_instruction(instr: &Instruction) -> String {
    let mut line = instr.mnemonic.clone();
    for arg in &instr.args {
        line.push(' ');
        line.push_str(&render_argument(arg));
    }
    line
}

/// Strings are re-encoded so that whitespace, `#` and `\` are always escaped.
fn render_argument(arg: &Argument) -> String {
    match arg {
        Argument::Const(Value::Str(s)) => format!("string@{}", escape::encode(escape::chars(s))),
        other => other.to_string(),
    }
}
