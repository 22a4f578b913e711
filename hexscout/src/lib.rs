pub mod buffer;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod pattern;
pub mod pattern_file;
pub mod results;
pub mod search;

pub use buffer::ByteBuffer;
pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use pattern::{compile, compile_pattern, validate, CompiledMatcher, Token};
pub use results::{MatchSpan, PatternResult, ResultReport};
pub use search::{run, search};
