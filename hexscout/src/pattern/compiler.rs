use regex::bytes::{Regex, RegexBuilder};

use super::token::Token;
use super::validator::{validate, ValidatedPattern};
use crate::errors::SearchResult;
use crate::results::MatchSpan;

/// An executable byte matcher built from one raw pattern.
///
/// Cloning is cheap and the matcher is `Send + Sync`, so it can be handed to
/// any worker thread.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pattern: String,
    regex: Regex,
}

impl CompiledMatcher {
    /// The raw pattern this matcher was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The byte-level regex expression being executed
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    /// Leftmost-first, non-overlapping matches over `haystack`.
    ///
    /// Each search resumes where the previous match ended, so an empty match
    /// right after a non-empty one is reported. Only an empty match moves the
    /// next search one byte further.
    pub fn find_spans<'h>(&'h self, haystack: &'h [u8]) -> impl Iterator<Item = MatchSpan> + 'h {
        let mut pos = 0;
        std::iter::from_fn(move || {
            if pos > haystack.len() {
                return None;
            }
            let m = self.regex.find_at(haystack, pos)?;
            pos = if m.start() == m.end() {
                m.end() + 1
            } else {
                m.end()
            };
            Some(MatchSpan::new(m.start(), m.end()))
        })
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Renders tokens as a byte-level regex expression.
///
/// Literal bytes become `\xHH` escapes; metacharacters and quantifiers are
/// copied verbatim and keep their regex meaning.
pub fn translate(tokens: &[Token]) -> String {
    let mut expression = String::with_capacity(tokens.len() * 4);
    for token in tokens {
        match token {
            Token::LiteralByte(byte) => expression.push_str(&format!("\\x{:02X}", byte)),
            Token::Metachar(c) => expression.push(*c),
            Token::Quantifier(q) => expression.push_str(q),
        }
    }
    expression
}

/// Unicode mode is off so `\xHH` and `[...]` match raw byte values, not
/// decoded code points.
pub(crate) fn build_regex(expression: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(expression).unicode(false).build()
}

/// Turns a validated pattern into a matcher. Cannot fail.
pub fn compile(validated: ValidatedPattern) -> CompiledMatcher {
    let (pattern, regex) = validated.into_parts();
    CompiledMatcher { pattern, regex }
}

/// Validates and compiles a raw pattern in one step
pub fn compile_pattern(raw: &str) -> SearchResult<CompiledMatcher> {
    validate(raw).map(compile)
}
