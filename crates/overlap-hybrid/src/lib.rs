//! overlap-hybrid
//!
//! Combines the exact matchers and a semantic scorer into per-source reports
//! and a corpus-wide verdict.

pub mod adapter;
pub mod aggregate;
pub mod cancel;
pub mod scorers;
pub mod verdict;

pub use adapter::ScorerAdapter;
pub use aggregate::{AggregateOutcome, Aggregator, RunStatus, RunWarning};
pub use cancel::CancellationFlag;
pub use scorers::{build_adapter, build_scorer};
pub use verdict::summarize;
