//! Parallel pattern search.
//!
//! The orchestrator ([`engine`]) compiles every pattern up front, then fans
//! one task per pattern out over a fixed-size rayon pool. Each task runs a
//! [`worker`] scan against the same borrowed byte slice; results are joined
//! and folded into a [`ResultReport`](crate::results::ResultReport).
//!
//! ```rust,ignore
//! let buffer = ByteBuffer::load(&path)?;
//! let report = run(&patterns, &buffer, NonZeroUsize::new(8).unwrap())?;
//! ```
pub mod engine;
pub mod worker;

pub use engine::{compile_patterns, run, run_compiled, search};
pub use worker::{find_spans, SearchWorker};
