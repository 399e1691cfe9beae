//! Escape sequences in string values.
//!
//! Strings are stored in the escaped source form. A backslash followed by
//! exactly three decimal digits (`\DDD`) denotes one character whose code
//! point is `DDD`. Anything else is taken literally, including a backslash
//! that does not start a complete escape.
//!
//! Whitespace, control characters, `#` and `\` cannot appear literally in
//! source, so [`encode_char`] escapes those when text is produced at runtime.
//! Only code points up to 999 have an escape form.

/// Decode the escaped form into the characters it denotes.
pub fn chars(text: &str) -> Vec<char> {
    let raw: Vec<char> = text.chars().collect();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] == '\\' {
            if let Some(c) = escape_at(&raw[i + 1..]) {
                out.push(c);
                i += 4;
                continue;
            }
        }
        out.push(raw[i]);
        i += 1;
    }

    out
}

/// Decode the escaped form into plain text.
pub fn decode(text: &str) -> String {
    chars(text).into_iter().collect()
}

/// Number of characters `text` denotes once decoded.
pub fn char_len(text: &str) -> usize {
    chars(text).len()
}

/// Encode a single character into its stored form.
pub fn encode_char(c: char) -> String {
    if needs_escape(c) {
        format!("\\{:03}", c as u32)
    } else {
        c.to_string()
    }
}

/// Encode a sequence of decoded characters into the stored form.
pub fn encode<I: IntoIterator<Item = char>>(chars: I) -> String {
    chars.into_iter().map(encode_char).collect()
}

/// Escape plain text (for instance a line read from input) into stored form.
pub fn escape(text: &str) -> String {
    encode(text.chars())
}

/// Returns true if every backslash in `text` starts a complete `\DDD` escape.
pub fn is_well_formed(text: &str) -> bool {
    let raw: Vec<char> = text.chars().collect();
    raw.iter()
        .enumerate()
        .filter(|(_, &c)| c == '\\')
        .all(|(i, _)| escape_at(&raw[i + 1..]).is_some())
}

fn escape_at(rest: &[char]) -> Option<char> {
    let digits = rest.get(..3)?;
    if !digits.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let code = digits
        .iter()
        .fold(0u32, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0));
    char::from_u32(code)
}

fn needs_escape(c: char) -> bool {
    let code = c as u32;
    code <= 999 && (code <= 32 || c.is_whitespace() || c.is_control() || c == '#' || c == '\\')
}
