use regex::bytes::Regex;
use tracing::{debug, trace};

use super::compiler::{build_regex, translate};
use super::token::{tokenize, Token};
use crate::errors::{SearchError, SearchResult};

/// A raw pattern that passed both the structural and the regex check.
///
/// Only [`validate`] creates these, so holding one proves the pattern
/// compiles.
#[derive(Debug, Clone)]
pub struct ValidatedPattern {
    raw: String,
    tokens: Vec<Token>,
    regex: Regex,
}

impl ValidatedPattern {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn into_parts(self) -> (String, Regex) {
        (self.raw, self.regex)
    }
}

/// Checks one raw pattern.
///
/// The structural check rejects stray hex digits and foreign characters with
/// [`SearchError::InvalidFormat`]. The translated expression must then build
/// as a byte regex, otherwise [`SearchError::InvalidRegexSyntax`] is returned
/// (dangling `+`, stacked repeats, unbalanced parentheses, `{3,2}`, ...).
pub fn validate(raw: &str) -> SearchResult<ValidatedPattern> {
    let tokens = tokenize(raw)?;
    check_repetitions(raw, &tokens)?;
    let expression = translate(&tokens);
    trace!("Pattern {} -> {}", raw, expression);

    let regex = build_regex(&expression).map_err(|e| SearchError::invalid_regex(raw, e))?;

    Ok(ValidatedPattern {
        raw: raw.to_string(),
        tokens,
        regex,
    })
}

/// What the previous token leaves for a following repetition operator
#[derive(Clone, Copy, PartialEq, Eq)]
enum Operand {
    /// Start of pattern, `^` or `(`
    Nothing,
    /// Something that can be repeated
    Atom,
    /// `*`, `+`, `?` or `{..}`; only a lazy `?` may follow
    Repeated,
    /// A repeat made lazy by `?`
    Lazy,
}

/// Rejects repetition operators with nothing to repeat (`+AA`, `^*`, `(*`)
/// and stacked repeats (`AA**`, `AA{2}{3}`), which the regex engine would
/// otherwise accept. `AA+?` and `AA{2}?` are lazy repeats and stay valid.
fn check_repetitions(raw: &str, tokens: &[Token]) -> SearchResult<()> {
    let mut operand = Operand::Nothing;
    // Tokens seen since an unclosed `[`; a leading `]` (or `^]`) is a member.
    let mut class: Option<Vec<&Token>> = None;

    for token in tokens {
        if let Some(members) = class.as_mut() {
            let leading = match members.as_slice() {
                [] => true,
                [Token::Metachar('^')] => true,
                _ => false,
            };
            if *token == Token::Metachar(']') && !leading {
                class = None;
                operand = Operand::Atom;
            } else {
                members.push(token);
            }
            continue;
        }

        let is_repeat = matches!(token, Token::Metachar('*' | '+' | '?') | Token::Quantifier(_));
        if !is_repeat {
            operand = match token {
                Token::Metachar('^') | Token::Metachar('(') => Operand::Nothing,
                Token::Metachar('[') => {
                    class = Some(Vec::new());
                    operand
                }
                _ => Operand::Atom,
            };
            continue;
        }

        operand = match (operand, token) {
            (Operand::Atom, _) => Operand::Repeated,
            (Operand::Repeated, Token::Metachar('?')) => Operand::Lazy,
            (Operand::Nothing, _) => {
                return Err(SearchError::invalid_regex(raw, "nothing to repeat"))
            }
            _ => return Err(SearchError::invalid_regex(raw, "multiple repeat")),
        };
    }

    Ok(())
}

/// Validates every pattern, stopping at the first invalid one
pub fn validate_all<S: AsRef<str>>(patterns: &[S]) -> SearchResult<Vec<ValidatedPattern>> {
    patterns.iter().map(|p| validate(p.as_ref())).collect()
}

/// Validates every pattern and collects all failures instead of stopping
pub fn check_all<S: AsRef<str>>(patterns: &[S]) -> Vec<SearchError> {
    let errors: Vec<SearchError> = patterns
        .iter()
        .filter_map(|p| validate(p.as_ref()).err())
        .collect();
    debug!(
        "Checked {} patterns, {} invalid",
        patterns.len(),
        errors.len()
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_patterns() {
        for raw in [
            "AABB",
            "aabb",
            "AA(BB)+",
            "AA{2,3}",
            "AA{2}",
            "^AA",
            "AA?BB*",
            "[AABB]+",
            "(AA,BB)",
            "",
        ] {
            assert!(validate(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_non_hex_rejected() {
        let err = validate("ZZ").unwrap_err();
        assert!(matches!(err, SearchError::InvalidFormat(ref p) if p == "ZZ"));
    }

    #[test]
    fn test_odd_hex_rejected() {
        assert!(matches!(validate("AAB"), Err(SearchError::InvalidFormat(_))));
        assert!(matches!(validate("A{2}"), Err(SearchError::InvalidFormat(_))));
    }

    #[test]
    fn test_quantifier_contents_are_not_hex() {
        // "{12}" holds a repeat count, not a byte.
        assert!(validate("AA{12}").is_ok());
        assert!(validate("AA{1}").is_ok());
    }

    #[test]
    fn test_unterminated_quantifier_is_format_error() {
        assert!(matches!(validate("AA{2,3"), Err(SearchError::InvalidFormat(_))));
        assert!(matches!(validate("AA}"), Err(SearchError::InvalidFormat(_))));
    }

    #[test]
    fn test_regex_syntax_errors() {
        for raw in ["+AA", "AA)", "(AA", "AA[BB", "AA{3,2}", "()+?("] {
            let err = validate(raw).unwrap_err();
            assert!(
                matches!(err, SearchError::InvalidRegexSyntax { ref pattern, .. } if pattern == raw),
                "{raw} should fail regex compilation, got {err:?}"
            );
        }
    }

    #[test]
    fn test_stacked_repeats_rejected() {
        for (raw, reason) in [
            ("^*", "nothing to repeat"),
            ("*AA", "nothing to repeat"),
            ("(+AA)", "nothing to repeat"),
            ("^{2}", "nothing to repeat"),
            ("AA**", "multiple repeat"),
            ("AA+*", "multiple repeat"),
            ("AA?+", "multiple repeat"),
            ("AA{2}{3}", "multiple repeat"),
            ("AA*{2}", "multiple repeat"),
            ("AA+??", "multiple repeat"),
        ] {
            match validate(raw) {
                Err(SearchError::InvalidRegexSyntax {
                    pattern,
                    reason: got,
                }) => {
                    assert_eq!(pattern, raw);
                    assert_eq!(got, reason, "{raw}");
                }
                other => panic!("{raw} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_lazy_repeats_allowed() {
        for raw in ["AA+?", "AA*?", "AA??", "AA{2}?", "AA{2,}?", "(AABB)+?CC"] {
            assert!(validate(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_repeat_characters_inside_class_are_members() {
        for raw in ["[*+?]", "[^*]+", "[]AA]*", "[^]AA]", "[{2}]"] {
            assert!(validate(raw).is_ok(), "{raw} should be valid");
        }
        assert!(validate("[AA]**").is_err());
    }

    #[test]
    fn test_validated_pattern_keeps_tokens() {
        let validated = validate("AA+").unwrap();
        assert_eq!(validated.raw(), "AA+");
        assert_eq!(
            validated.tokens(),
            &[Token::LiteralByte(0xAA), Token::Metachar('+')]
        );
    }

    #[test]
    fn test_validate_all_fails_fast() {
        let patterns = ["AABB", "ZZ", "AA)"];
        let err = validate_all(&patterns).unwrap_err();
        assert!(matches!(err, SearchError::InvalidFormat(ref p) if p == "ZZ"));

        let ok = validate_all(&["AABB", "CC+"]).unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_check_all_collects_every_failure() {
        let patterns = ["AABB", "ZZ", "AA)", "A"];
        let errors = check_all(&patterns);
        let offending: Vec<_> = errors.iter().filter_map(|e| e.pattern()).collect();
        assert_eq!(offending, vec!["ZZ", "AA)", "A"]);
    }
}
