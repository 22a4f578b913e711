use std::fmt;

use crate::errors::{SearchError, SearchResult};

/// Characters that keep their regex meaning inside a pattern
pub const SUPPORTED_METACHARS: &str = "^*+?[](),";

/// One lexical unit of a hybrid hex/regex pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Two hex digits, e.g. `AA`
    LiteralByte(u8),
    /// A single supported metacharacter
    Metachar(char),
    /// A bounded repeat such as `{2,3}`, braces included
    Quantifier(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LiteralByte(byte) => write!(f, "{:02X}", byte),
            Token::Metachar(c) => write!(f, "{}", c),
            Token::Quantifier(q) => f.write_str(q),
        }
    }
}

/// Splits a raw pattern into tokens.
///
/// Fails with [`SearchError::InvalidFormat`] when a hex digit is not followed
/// by a second one, when a `{` does not open a well-formed repeat count, or
/// when a character is neither hex nor a supported metacharacter.
pub fn tokenize(raw: &str) -> SearchResult<Vec<Token>> {
    let mut tokens = Vec::with_capacity(raw.len() / 2 + 1);
    let mut chars = raw.char_indices();

    while let Some((i, c)) = chars.next() {
        if let Some(high) = c.to_digit(16) {
            let low = chars.next().and_then(|(_, next)| next.to_digit(16));
            match low {
                Some(low) => tokens.push(Token::LiteralByte((high << 4 | low) as u8)),
                None => return Err(SearchError::invalid_format(raw)),
            }
        } else if c == '{' {
            let rest = &raw[i + 1..];
            let close = rest
                .find('}')
                .ok_or_else(|| SearchError::invalid_format(raw))?;
            if !is_repeat_count(&rest[..close]) {
                return Err(SearchError::invalid_format(raw));
            }
            tokens.push(Token::Quantifier(raw[i..=i + 1 + close].to_string()));
            // The body is ASCII, so char and byte counts agree.
            chars.nth(close);
        } else if SUPPORTED_METACHARS.contains(c) {
            tokens.push(Token::Metachar(c));
        } else {
            return Err(SearchError::invalid_format(raw));
        }
    }

    Ok(tokens)
}

/// `n`, `n,` or `n,m` with decimal digits
fn is_repeat_count(body: &str) -> bool {
    let (min, max) = match body.split_once(',') {
        Some((min, max)) => (min, Some(max)),
        None => (body, None),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    !min.is_empty() && digits(min) && max.map_or(true, digits)
}
