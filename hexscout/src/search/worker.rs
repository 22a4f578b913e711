use tracing::trace;

use crate::metrics::SearchMetrics;
use crate::pattern::CompiledMatcher;
use crate::results::{MatchSpan, PatternResult};

/// All non-overlapping matches of `matcher` in `haystack`, left to right.
///
/// After a zero-length match the scan moves on by one byte, so patterns like
/// `AA*` terminate. An empty match may start where a longer one ended.
pub fn find_spans(matcher: &CompiledMatcher, haystack: &[u8]) -> Vec<MatchSpan> {
    matcher.find_spans(haystack).collect()
}

/// Runs one pattern scan and reports it to the shared metrics
#[derive(Debug, Clone, Default)]
pub struct SearchWorker {
    metrics: SearchMetrics,
}

impl SearchWorker {
    pub fn new(metrics: SearchMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    pub fn search(&self, matcher: &CompiledMatcher, haystack: &[u8]) -> PatternResult {
        let spans = find_spans(matcher, haystack);
        let empty = spans.iter().filter(|s| s.is_empty()).count();
        trace!(
            "Pattern {} matched {} times",
            matcher.pattern(),
            spans.len()
        );
        self.metrics
            .record_scan(haystack.len() as u64, spans.len() as u64, empty as u64);

        PatternResult {
            pattern: matcher.pattern().to_string(),
            spans,
        }
    }
}
