//! IPPcode24 assembler: source text ↔ instruction stream.
//!
//! Programs in the XML representation are loaded with [`load_xml`].
//!
//! The assembler is a mechanical 1:1 translation. Each non-blank source
//! line after the `.IPPcode24` header becomes one instruction, numbered
//! from 1 in source order.
//!
//! # Usage
//!
//! ```
//! use ippcode_assembler::{assemble, disassemble};
//!
//! let text = ".IPPcode24\nDEFVAR GF@x\nMOVE GF@x int@42\nWRITE GF@x\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for every program
//! produced by [`assemble`]. The disassembler outputs canonical text; the
//! assembler also accepts non-canonical input (lower-case mnemonics, hex
//! and octal integers, comments).

pub mod error;

mod disassembler;
mod lexer;
mod parser;
pub mod xml;

pub use error::{AsmError, XmlError};
pub use xml::load_xml;

use ippcode_common::Program;
use lexer::{tokenize_line, Token};
use parser::parse_line;

/// Assemble source text into a program.
///
/// Returns the first error encountered. Source without any instruction
/// or header assembles to an empty program.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut header_seen = false;
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;

        match tokens.first() {
            None => {}
            Some(Token::Header) => {
                if header_seen {
                    return Err(AsmError::DuplicateHeader { line: line_num });
                }
                if let Some(extra) = tokens.get(1) {
                    return Err(AsmError::UnexpectedToken {
                        line: line_num,
                        token: extra.text(),
                    });
                }
                header_seen = true;
            }
            Some(_) => {
                if !header_seen {
                    return Err(AsmError::MissingHeader { line: line_num });
                }
                let order = instructions.len() as u32 + 1;
                instructions.push(parse_line(&tokens, line_num, order)?);
            }
        }
    }

    Ok(Program::new(instructions))
}

/// Disassemble a program into canonical source text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippcode_common::{Argument, Opcode, Value};

    #[test]
    fn assemble_minimal() {
        let program = assemble(".IPPcode24\nWRITE int@42\n").unwrap();
        assert_eq!(program.len(), 1);
        let instr = &program.instructions[0];
        assert_eq!(instr.opcode, Some(Opcode::Write));
        assert_eq!(instr.args, vec![Argument::Const(Value::Int(42))]);
        assert_eq!(instr.order, 1);
    }

    #[test]
    fn orders_follow_source_lines() {
        let program = assemble(".IPPcode24\n\nCREATEFRAME\n# skip\nPUSHFRAME\n").unwrap();
        let orders: Vec<u32> = program.instructions.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn empty_source() {
        assert_eq!(assemble(""), Ok(Program::default()));
        assert_eq!(assemble("# nothing\n\n"), Ok(Program::default()));
    }

    #[test]
    fn header_only() {
        assert_eq!(assemble(".IPPcode24\n"), Ok(Program::default()));
    }

    #[test]
    fn missing_header() {
        let err = assemble("# comment\nWRITE int@1\n").unwrap_err();
        assert_eq!(err, AsmError::MissingHeader { line: 2 });
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn duplicate_header() {
        let err = assemble(".IPPcode24\n.ippcode24\n").unwrap_err();
        assert_eq!(err, AsmError::DuplicateHeader { line: 2 });
        assert_eq!(err.exit_code(), 23);
    }

    #[test]
    fn header_with_trailing_token() {
        let err = assemble(".IPPcode24 WRITE\n").unwrap_err();
        assert!(matches!(err, AsmError::UnexpectedToken { line: 1, .. }));
    }

    #[test]
    fn error_reports_correct_line() {
        let err = assemble(".IPPcode24\nBREAK\nFOOBAR\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownOpcode { line: 3, .. }));
    }

    #[test]
    fn roundtrip_assemble_then_disassemble_then_assemble() {
        let text = "
.ippcode24   # header
defvar GF@counter
move GF@counter int@0x10
label loop
sub GF@counter GF@counter int@1
jumpifneq loop GF@counter int@0
write string@done\\010
";
        let first = assemble(text).unwrap();
        let canonical = disassemble(&first);
        assert!(canonical.contains("MOVE GF@counter int@16\n"));
        let second = assemble(&canonical).unwrap();
        assert_eq!(first, second);
    }
}
