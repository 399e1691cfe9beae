//! Tokenizer for IPPcode24 source text.

use crate::error::AsmError;

/// The header every program starts with. Matched case-insensitively.
pub(crate) const HEADER: &str = ".IPPcode24";

/// A single token from a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// The `.IPPcode24` header.
    Header,
    /// A bare word: opcode mnemonic, label name or type name.
    Word(String),
    /// A word of the form `prefix@body`: a variable or a literal.
    Operand { prefix: String, body: String },
}

impl Token {
    /// The token as it appeared in source.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Header => HEADER.to_string(),
            Token::Word(w) => w.clone(),
            Token::Operand { prefix, body } => format!("{prefix}@{body}"),
        }
    }
}

/// Tokenize a single line of source text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let token = if word.eq_ignore_ascii_case(HEADER) {
            Token::Header
        } else if word.starts_with('.') {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: word.to_string(),
            });
        } else if let Some((prefix, body)) = word.split_once('@') {
            Token::Operand {
                prefix: prefix.to_string(),
                body: body.to_string(),
            }
        } else {
            Token::Word(word.to_string())
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Label and variable names: a letter or one of `_-$&%*!?`, then also digits.
pub(crate) fn is_identifier(name: &str) -> bool {
    const SPECIAL: &str = "_-$&%*!?";
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || SPECIAL.contains(c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || SPECIAL.contains(c))
}
