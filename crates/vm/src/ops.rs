//! Operation semantics on resolved values.
//!
//! Every function takes the order number of the executing instruction so
//! that failures carry it. Strings are indexed by decoded character.

use std::cmp::Ordering;

use ippcode_common::{escape, Opcode, Value};

use crate::error::RuntimeError;

fn mismatch(at: u32, opcode: Opcode) -> RuntimeError {
    RuntimeError::TypeMismatch {
        at,
        opcode: opcode.mnemonic(),
    }
}

/// ADD, SUB, MUL and IDIV. Results wrap on overflow.
pub fn arithmetic(at: u32, opcode: Opcode, a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    let (Value::Int(x), Value::Int(y)) = (a, b) else {
        return Err(mismatch(at, opcode));
    };
    let result = match opcode {
        Opcode::Add => x.wrapping_add(*y),
        Opcode::Sub => x.wrapping_sub(*y),
        Opcode::Mul => x.wrapping_mul(*y),
        Opcode::Idiv => {
            if *y == 0 {
                return Err(RuntimeError::DivisionByZero { at });
            }
            x.wrapping_div(*y)
        }
        _ => return Err(mismatch(at, opcode)),
    };
    Ok(Value::Int(result))
}

/// Ordering for LT and GT. Both operands share a type other than nil.
pub fn compare(at: u32, opcode: Opcode, a: &Value, b: &Value) -> Result<Ordering, RuntimeError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(escape::chars(x).cmp(&escape::chars(y))),
        _ => Err(mismatch(at, opcode)),
    }
}

/// EQ: same types, or at least one nil.
pub fn equals(at: u32, a: &Value, b: &Value) -> Result<bool, RuntimeError> {
    if matches!(a, Value::Nil) || matches!(b, Value::Nil) || a.type_tag() == b.type_tag() {
        Ok(a == b)
    } else {
        Err(mismatch(at, Opcode::Eq))
    }
}

/// JUMPIFEQ and JUMPIFNEQ: operand types must be identical.
pub fn jump_equals(at: u32, opcode: Opcode, a: &Value, b: &Value) -> Result<bool, RuntimeError> {
    if a.type_tag() == b.type_tag() {
        Ok(a == b)
    } else {
        Err(mismatch(at, opcode))
    }
}

/// AND and OR.
pub fn logic(at: u32, opcode: Opcode, a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match (opcode, a, b) {
        (Opcode::And, Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x && *y)),
        (Opcode::Or, Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x || *y)),
        _ => Err(mismatch(at, opcode)),
    }
}

pub fn not(at: u32, a: &Value) -> Result<Value, RuntimeError> {
    match a {
        Value::Bool(x) => Ok(Value::Bool(!x)),
        _ => Err(mismatch(at, Opcode::Not)),
    }
}

/// INT2CHAR: a code in 0..=255 becomes a one-character `\DDD` string.
pub fn int2char(at: u32, a: &Value) -> Result<Value, RuntimeError> {
    let Value::Int(code) = a else {
        return Err(mismatch(at, Opcode::Int2Char));
    };
    if !(0..=255).contains(code) {
        return Err(RuntimeError::CharCodeOutOfRange { at, code: *code });
    }
    Ok(Value::Str(format!("\\{code:03}")))
}

/// Decoded characters of a string operand and a valid index into them.
fn indexed(
    at: u32,
    opcode: Opcode,
    text: &Value,
    index: &Value,
) -> Result<(Vec<char>, usize), RuntimeError> {
    let (Value::Str(s), Value::Int(i)) = (text, index) else {
        return Err(mismatch(at, opcode));
    };
    let chars = escape::chars(s);
    match usize::try_from(*i) {
        Ok(pos) if pos < chars.len() => Ok((chars, pos)),
        _ => Err(RuntimeError::IndexOutOfRange {
            at,
            index: *i,
            length: chars.len(),
        }),
    }
}

/// STRI2INT: code point of the character at an index.
pub fn stri2int(at: u32, text: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let (chars, pos) = indexed(at, Opcode::Stri2Int, text, index)?;
    Ok(Value::Int(i64::from(u32::from(chars[pos]))))
}

/// GETCHAR: the character at an index as a one-character string.
pub fn getchar(at: u32, text: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let (chars, pos) = indexed(at, Opcode::Getchar, text, index)?;
    Ok(Value::Str(escape::encode_char(chars[pos])))
}

/// SETCHAR: replace the character at an index with the first character of `with`.
pub fn setchar(at: u32, current: &Value, index: &Value, with: &Value) -> Result<Value, RuntimeError> {
    let Value::Str(replacement) = with else {
        return Err(mismatch(at, Opcode::Setchar));
    };
    let (mut chars, pos) = indexed(at, Opcode::Setchar, current, index)?;
    let first = escape::chars(replacement)
        .into_iter()
        .next()
        .ok_or(RuntimeError::EmptyReplacement { at })?;
    chars[pos] = first;
    Ok(Value::Str(escape::encode(chars)))
}

pub fn concat(at: u32, a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::Str(format!("{x}{y}"))),
        _ => Err(mismatch(at, Opcode::Concat)),
    }
}

/// STRLEN: number of decoded characters.
pub fn strlen(at: u32, a: &Value) -> Result<Value, RuntimeError> {
    match a {
        Value::Str(s) => Ok(Value::Int(escape::char_len(s) as i64)),
        _ => Err(mismatch(at, Opcode::Strlen)),
    }
}

/// TYPE: the type name, or the empty string for an uninitialized variable.
pub fn type_name(value: Option<&Value>) -> Value {
    let name = value.map(|v| v.type_tag().name()).unwrap_or("");
    Value::Str(name.to_string())
}

/// EXIT: validate the requested exit code.
pub fn exit_code(at: u32, a: &Value) -> Result<u8, RuntimeError> {
    let Value::Int(code) = a else {
        return Err(mismatch(at, Opcode::Exit));
    };
    match u8::try_from(*code) {
        Ok(c) if c <= 9 => Ok(c),
        _ => Err(RuntimeError::ExitCodeOutOfRange { at, code: *code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn arithmetic_on_ints() {
        assert_eq!(
            arithmetic(1, Opcode::Add, &Value::Int(2), &Value::Int(3)),
            Ok(Value::Int(5))
        );
        assert_eq!(
            arithmetic(1, Opcode::Sub, &Value::Int(2), &Value::Int(3)),
            Ok(Value::Int(-1))
        );
        assert_eq!(
            arithmetic(1, Opcode::Mul, &Value::Int(-4), &Value::Int(3)),
            Ok(Value::Int(-12))
        );
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(
            arithmetic(1, Opcode::Add, &Value::Int(i64::MAX), &Value::Int(1)),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(
            arithmetic(1, Opcode::Idiv, &Value::Int(i64::MIN), &Value::Int(-1)),
            Ok(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn idiv_truncates_toward_zero() {
        assert_eq!(
            arithmetic(1, Opcode::Idiv, &Value::Int(-7), &Value::Int(2)),
            Ok(Value::Int(-3))
        );
    }

    #[test]
    fn idiv_by_zero() {
        let err = arithmetic(4, Opcode::Idiv, &Value::Int(1), &Value::Int(0)).unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero { at: 4 });
        assert_eq!(err.exit_code(), 57);
    }

    #[test]
    fn arithmetic_rejects_non_ints() {
        let err = arithmetic(1, Opcode::Add, &Value::Int(1), &s("1")).unwrap_err();
        assert_eq!(err.exit_code(), 53);
    }

    #[test]
    fn compare_same_types() {
        assert_eq!(
            compare(1, Opcode::Lt, &Value::Bool(false), &Value::Bool(true)),
            Ok(Ordering::Less)
        );
        assert_eq!(compare(1, Opcode::Gt, &s("b"), &s("abc")), Ok(Ordering::Greater));
        // \097 is 'a'
        assert_eq!(compare(1, Opcode::Lt, &s("\\097"), &s("a")), Ok(Ordering::Equal));
    }

    #[test]
    fn compare_rejects_nil() {
        let err = compare(1, Opcode::Lt, &Value::Nil, &Value::Nil).unwrap_err();
        assert_eq!(err.exit_code(), 53);
    }

    #[test]
    fn equals_with_nil() {
        assert_eq!(equals(1, &Value::Nil, &Value::Int(0)), Ok(false));
        assert_eq!(equals(1, &s(""), &Value::Nil), Ok(false));
        assert_eq!(equals(1, &Value::Nil, &Value::Nil), Ok(true));
    }

    #[test]
    fn equals_rejects_mixed_types() {
        let err = equals(1, &Value::Int(1), &Value::Bool(true)).unwrap_err();
        assert_eq!(err.exit_code(), 53);
    }

    #[test]
    fn jump_equals_is_strict_about_nil() {
        assert_eq!(jump_equals(1, Opcode::JumpIfEq, &Value::Nil, &Value::Nil), Ok(true));
        assert!(jump_equals(1, Opcode::JumpIfEq, &Value::Nil, &Value::Int(1)).is_err());
    }

    #[test]
    fn logic_and_not() {
        assert_eq!(
            logic(1, Opcode::And, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            logic(1, Opcode::Or, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(true))
        );
        assert_eq!(not(1, &Value::Bool(true)), Ok(Value::Bool(false)));
        assert!(not(1, &Value::Int(1)).is_err());
    }

    #[test]
    fn int2char_range() {
        assert_eq!(int2char(1, &Value::Int(65)), Ok(s("\\065")));
        assert_eq!(int2char(1, &Value::Int(0)), Ok(s("\\000")));
        assert_eq!(
            int2char(2, &Value::Int(256)),
            Err(RuntimeError::CharCodeOutOfRange { at: 2, code: 256 })
        );
        assert!(int2char(1, &Value::Int(-1)).is_err());
    }

    #[test]
    fn stri2int_reads_decoded_char() {
        assert_eq!(stri2int(1, &s("a\\032b"), &Value::Int(1)), Ok(Value::Int(32)));
        assert_eq!(stri2int(1, &s("a\\032b"), &Value::Int(2)), Ok(Value::Int(98)));
    }

    #[test]
    fn index_out_of_range() {
        let err = getchar(3, &s("ab"), &Value::Int(2)).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::IndexOutOfRange {
                at: 3,
                index: 2,
                length: 2
            }
        );
        assert_eq!(err.exit_code(), 58);
        assert!(getchar(3, &s("ab"), &Value::Int(-1)).is_err());
    }

    #[test]
    fn getchar_escapes_whitespace() {
        assert_eq!(getchar(1, &s("a\\032"), &Value::Int(1)), Ok(s("\\032")));
        assert_eq!(getchar(1, &s("xyz"), &Value::Int(2)), Ok(s("z")));
    }

    #[test]
    fn setchar_replaces_one_char() {
        assert_eq!(setchar(1, &s("abc"), &Value::Int(1), &s("XY")), Ok(s("aXc")));
        assert_eq!(setchar(1, &s("abc"), &Value::Int(0), &s("\\035")), Ok(s("\\035bc")));
    }

    #[test]
    fn setchar_errors() {
        assert_eq!(
            setchar(1, &s("abc"), &Value::Int(0), &s("")),
            Err(RuntimeError::EmptyReplacement { at: 1 })
        );
        assert_eq!(
            setchar(1, &s("abc"), &Value::Int(5), &s("x")).unwrap_err().exit_code(),
            58
        );
        assert_eq!(
            setchar(1, &Value::Int(0), &Value::Int(0), &s("x")).unwrap_err().exit_code(),
            53
        );
    }

    #[test]
    fn concat_and_strlen() {
        assert_eq!(concat(1, &s("ab"), &s("\\032c")), Ok(s("ab\\032c")));
        assert_eq!(strlen(1, &s("ab\\032c")), Ok(Value::Int(4)));
        assert!(concat(1, &s("a"), &Value::Nil).is_err());
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(Some(&Value::Int(1))), s("int"));
        assert_eq!(type_name(Some(&Value::Nil)), s("nil"));
        assert_eq!(type_name(None), s(""));
    }

    #[test]
    fn exit_code_range() {
        assert_eq!(exit_code(1, &Value::Int(9)), Ok(9));
        assert_eq!(exit_code(1, &Value::Int(0)), Ok(0));
        assert_eq!(exit_code(1, &Value::Int(10)).unwrap_err().exit_code(), 57);
        assert_eq!(exit_code(1, &Value::Int(-1)).unwrap_err().exit_code(), 57);
        assert_eq!(exit_code(1, &Value::Bool(true)).unwrap_err().exit_code(), 53);
    }
}
