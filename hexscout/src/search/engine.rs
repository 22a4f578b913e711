use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tracing::{debug, info};

use super::worker::SearchWorker;
use crate::buffer::ByteBuffer;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::pattern::{compile, validate, CompiledMatcher};
use crate::pattern_file::load_patterns;
use crate::results::{PatternResult, ResultReport};

/// Loads the pattern file and binary named in `config` and searches them
pub fn search(config: &SearchConfig) -> SearchResult<ResultReport> {
    config.validate()?;

    info!("Loading patterns file {}", config.patterns_path.display());
    let patterns = load_patterns(&config.patterns_path)?;
    let matchers = compile_patterns(&patterns)?;

    info!("Reading binary file {}", config.binary_path.display());
    let buffer = ByteBuffer::load(&config.binary_path)?;

    run_compiled(&matchers, &buffer, config.worker_count)
}

/// Validates and compiles every pattern.
///
/// Stops at the first invalid pattern, so nothing is searched unless the
/// whole set is valid. Repeated patterns are compiled once.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> SearchResult<Vec<CompiledMatcher>> {
    let mut seen = HashSet::with_capacity(patterns.len());
    let mut matchers = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !seen.insert(pattern) {
            debug!("Skipping repeated pattern {}", pattern);
            continue;
        }
        matchers.push(compile(validate(pattern)?));
    }

    debug!("Compiled {} patterns", matchers.len());
    Ok(matchers)
}

/// Validates, compiles and searches `patterns` over `buffer`
pub fn run<S: AsRef<str>>(
    patterns: &[S],
    buffer: &[u8],
    worker_count: NonZeroUsize,
) -> SearchResult<ResultReport> {
    let matchers = compile_patterns(patterns)?;
    run_compiled(&matchers, buffer, worker_count)
}

/// Searches already compiled matchers over `buffer` on a pool of
/// `worker_count` threads
pub fn run_compiled(
    matchers: &[CompiledMatcher],
    buffer: &[u8],
    worker_count: NonZeroUsize,
) -> SearchResult<ResultReport> {
    run_with_metrics(matchers, buffer, worker_count, SearchMetrics::new())
}

pub(crate) fn run_with_metrics(
    matchers: &[CompiledMatcher],
    buffer: &[u8],
    worker_count: NonZeroUsize,
    metrics: SearchMetrics,
) -> SearchResult<ResultReport> {
    let mut report = ResultReport::new();
    report.bytes_scanned = buffer.len();

    if matchers.is_empty() {
        debug!("No search patterns provided, returning empty result");
        return Ok(report);
    }

    metrics.record_compiled(matchers.len() as u64);
    info!("Worker threads: {}", worker_count);
    info!("{} patterns total", matchers.len());
    info!("Starting search over {} bytes", buffer.len());

    let pool = ThreadPoolBuilder::new()
        .num_threads(worker_count.get())
        .thread_name(|i| format!("hexscout-worker-{}", i))
        .build()
        .map_err(|e| SearchError::config_error(format!("failed to start worker pool: {}", e)))?;

    let worker = SearchWorker::new(metrics.clone());

    // Indexed collect keeps input order regardless of completion order.
    let results: Vec<PatternResult> = pool.install(|| {
        matchers
            .par_iter()
            .map(|matcher| worker.search(matcher, buffer))
            .collect()
    });

    for result in results {
        report.add_pattern_result(result);
    }

    metrics.log_stats();

    info!(
        "Search complete. Found {} matches for {} of {} patterns",
        report.total_matches, report.patterns_with_matches, report.patterns_searched
    );

    Ok(report)
}
