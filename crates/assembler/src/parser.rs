//! Parser for IPPcode24 tokens → instructions.
//!
//! Dispatches on the opcode's operand signature: each slot is a variable,
//! a symbol (variable or literal), a label or a type name.

use crate::error::AsmError;
use crate::lexer::{is_identifier, Token};
use ippcode_common::{escape, Argument, FrameKind, Instruction, Opcode, Slot, TypeTag, Value, VarRef};

/// Parse the tokens of one non-blank source line into an instruction.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize, order: u32) -> Result<Instruction, AsmError> {
    let (first, operands) = match tokens.split_first() {
        Some(split) => split,
        None => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: String::new(),
            })
        }
    };

    let opcode = match first {
        Token::Word(w) => Opcode::from_mnemonic(w),
        _ => None,
    }
    .ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: first.text(),
    })?;

    let signature = opcode.signature();
    if operands.len() != signature.len() {
        return Err(AsmError::WrongOperandCount {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            found: operands.len(),
        });
    }

    let args = signature
        .iter()
        .zip(operands)
        .map(|(&slot, token)| parse_operand(slot, token, line_num))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Instruction::new(opcode, args, order))
}

fn parse_operand(slot: Slot, token: &Token, line_num: usize) -> Result<Argument, AsmError> {
    match slot {
        Slot::Var => expect_var(token, line_num).map(Argument::Var),
        Slot::Symb => match expect_var(token, line_num) {
            Ok(var) => Ok(Argument::Var(var)),
            Err(_) => expect_literal(token, line_num).map(Argument::Const),
        },
        Slot::Label => expect_label(token, line_num),
        Slot::Type => expect_type(token, line_num),
    }
}

fn invalid(token: &Token, line_num: usize, expected: &'static str) -> AsmError {
    AsmError::InvalidOperand {
        line: line_num,
        expected,
        token: token.text(),
    }
}

fn expect_var(token: &Token, line_num: usize) -> Result<VarRef, AsmError> {
    match token {
        Token::Operand { prefix, body } => {
            let frame = FrameKind::from_prefix(prefix)
                .ok_or_else(|| invalid(token, line_num, "a variable"))?;
            if !is_identifier(body) {
                return Err(invalid(token, line_num, "a variable name"));
            }
            Ok(VarRef::new(frame, body.as_str()))
        }
        _ => Err(invalid(token, line_num, "a variable")),
    }
}

fn expect_literal(token: &Token, line_num: usize) -> Result<Value, AsmError> {
    let Token::Operand { prefix, body } = token else {
        return Err(invalid(token, line_num, "a variable or literal"));
    };

    match prefix.as_str() {
        "int" => parse_int(body).map(Value::Int).ok_or_else(|| AsmError::InvalidNumber {
            line: line_num,
            token: token.text(),
        }),
        "bool" => match body.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid(token, line_num, "bool@true or bool@false")),
        },
        "nil" if body == "nil" => Ok(Value::Nil),
        "nil" => Err(invalid(token, line_num, "nil@nil")),
        "string" => {
            if escape::is_well_formed(body) {
                Ok(Value::Str(body.clone()))
            } else {
                Err(AsmError::InvalidEscape {
                    line: line_num,
                    token: token.text(),
                })
            }
        }
        _ => Err(invalid(token, line_num, "a variable or literal")),
    }
}

/// Integer literal: optional sign, then decimal digits, `0x` hex or `0o` octal.
fn parse_int(text: &str) -> Option<i64> {
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };
    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(oct) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, oct)
    } else {
        (10, rest)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

fn expect_label(token: &Token, line_num: usize) -> Result<Argument, AsmError> {
    match token {
        Token::Word(name) if is_identifier(name) => Ok(Argument::Label(name.clone())),
        _ => Err(invalid(token, line_num, "a label")),
    }
}

fn expect_type(token: &Token, line_num: usize) -> Result<Argument, AsmError> {
    match token {
        Token::Word(name) if TypeTag::from_name(name).is_some_and(|t| t.is_readable()) => {
            Ok(Argument::Type(name.clone()))
        }
        _ => Err(invalid(token, line_num, "int, bool or string")),
    }
}
