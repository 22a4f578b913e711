//! Hybrid hex/regex patterns.
//!
//! A pattern such as `AABB(CC)+` mixes two-digit hex literals, one byte each,
//! with a small whitelist of regex metacharacters. Patterns go through three
//! stages:
//!
//! 1. [`token::tokenize`] splits the raw text into [`Token`]s and rejects
//!    anything outside the hex/metacharacter alphabet.
//! 2. [`validator::validate`] translates the tokens into a byte-level regex
//!    expression and checks that it compiles.
//! 3. [`compiler::compile`] turns the validated pattern into a
//!    [`CompiledMatcher`] that can be shared across worker threads.
pub mod compiler;
pub mod token;
pub mod validator;

pub use compiler::{compile, compile_pattern, CompiledMatcher};
pub use token::{tokenize, Token, SUPPORTED_METACHARS};
pub use validator::{check_all, validate, validate_all, ValidatedPattern};
