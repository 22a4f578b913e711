//! Search result types.
//!
//! A [`ResultReport`] maps each pattern that matched at least once to the
//! spans it matched, in scan order. When serialized it becomes a JSON object
//! whose offsets are hex strings:
//!
//! ```json
//! {"AABB": [["0x0", "0x2"], ["0x3", "0x5"]]}
//! ```

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::SearchResult;

/// A half-open byte range `[start, end)` within the target buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for MatchSpan {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl Serialize for MatchSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&format!("{:#x}", self.start))?;
        seq.serialize_element(&format!("{:#x}", self.end))?;
        seq.end()
    }
}

/// All spans found for a single pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternResult {
    /// The raw pattern text
    pub pattern: String,
    /// Matches in scan order
    pub spans: Vec<MatchSpan>,
}

/// The complete outcome of a run
#[derive(Debug, Clone, Default)]
pub struct ResultReport {
    /// Results for patterns with at least one match
    pub pattern_results: Vec<PatternResult>,
    /// Total number of spans across all patterns
    pub total_matches: usize,
    /// Number of distinct patterns searched
    pub patterns_searched: usize,
    /// Number of patterns with at least one match
    pub patterns_with_matches: usize,
    /// Size of the searched buffer
    pub bytes_scanned: usize,
}

impl ResultReport {
    /// Creates a new empty report
    pub fn new() -> Self {
        Default::default()
    }

    /// Records the outcome of one pattern; patterns without matches only
    /// count towards `patterns_searched`
    pub fn add_pattern_result(&mut self, result: PatternResult) {
        self.patterns_searched += 1;
        if !result.spans.is_empty() {
            self.total_matches += result.spans.len();
            self.patterns_with_matches += 1;
            self.pattern_results.push(result);
        }
    }

    /// Spans for `pattern`, if it matched
    pub fn get(&self, pattern: &str) -> Option<&[MatchSpan]> {
        self.pattern_results
            .iter()
            .find(|r| r.pattern == pattern)
            .map(|r| r.spans.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pattern_results.len()
    }

    /// Content view that ignores entry order
    pub fn as_map(&self) -> BTreeMap<&str, &[MatchSpan]> {
        self.pattern_results
            .iter()
            .map(|r| (r.pattern.as_str(), r.spans.as_slice()))
            .collect()
    }

    pub fn to_json(&self) -> SearchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> SearchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for ResultReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.pattern_results
                .iter()
                .map(|r| (r.pattern.as_str(), r.spans.as_slice())),
        )
    }
}
