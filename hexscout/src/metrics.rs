use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters shared by the orchestrator and its workers.
///
/// Cloning shares the underlying counters. Metrics are informational only and
/// never feed back into results.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    patterns_compiled: Arc<AtomicU64>,
    patterns_searched: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,
    empty_matches: Arc<AtomicU64>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self {
            patterns_compiled: Arc::new(AtomicU64::new(0)),
            patterns_searched: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
            empty_matches: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_compiled(&self, count: u64) {
        self.patterns_compiled.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one finished pattern scan
    pub fn record_scan(&self, bytes: u64, matches: u64, empty: u64) {
        self.patterns_searched.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
        self.empty_matches.fetch_add(empty, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            patterns_compiled: self.patterns_compiled.load(Ordering::Relaxed),
            patterns_searched: self.patterns_searched.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            empty_matches: self.empty_matches.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        debug!(
            "Search stats:\n\
             Patterns compiled/searched: {}/{}\n\
             Bytes scanned (all patterns): {}\n\
             Matches found: {} ({} zero-length)",
            stats.patterns_compiled,
            stats.patterns_searched,
            stats.bytes_scanned,
            stats.matches_found,
            stats.empty_matches
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub patterns_compiled: u64,
    pub patterns_searched: u64,
    pub bytes_scanned: u64,
    pub matches_found: u64,
    pub empty_matches: u64,
}
