use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation shared between the caller and an aggregation run.
/// The aggregator checks it before scoring each reference.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }
}
