//! Guards a [`SemanticScorer`] call: optional wall-clock timeout, panic
//! capture, and range validation. Every problem becomes
//! [`Error::ScorerFailure`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use overlap_core::error::{Error, Result};
use overlap_core::traits::SemanticScorer;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

pub struct ScorerAdapter {
    scorer: Arc<dyn SemanticScorer>,
    timeout: Option<Duration>,
    runtime: Option<Runtime>,
}

impl ScorerAdapter {
    pub fn new(scorer: Arc<dyn SemanticScorer>) -> Self { Self { scorer, timeout: None, runtime: None } }

    /// Calls run on a blocking thread of a runtime owned by the adapter and the
    /// caller waits on a channel, so this works from inside another tokio
    /// runtime too. A call that overruns is abandoned; its thread finishes in
    /// the background.
    pub fn with_timeout(scorer: Arc<dyn SemanticScorer>, timeout: Duration) -> anyhow::Result<Self> {
        let runtime = Builder::new_multi_thread().worker_threads(1).thread_name("scorer").enable_time().build()?;
        Ok(Self { scorer, timeout: Some(timeout), runtime: Some(runtime) })
    }

    pub fn id(&self) -> &str { self.scorer.id() }

    pub fn timeout(&self) -> Option<Duration> { self.timeout }

    /// Similarity percentage in `[0, 100]`.
    pub fn score(&self, candidate: &str, reference: &str) -> Result<f64> {
        let value = match (&self.runtime, self.timeout) {
            (Some(runtime), Some(limit)) => self.score_with_timeout(runtime, limit, candidate, reference)?,
            _ => panic::catch_unwind(AssertUnwindSafe(|| self.scorer.similarity(candidate, reference)))
                .map_err(|_| Error::ScorerFailure(format!("{} panicked", self.id())))?
                .map_err(|e| Error::ScorerFailure(format!("{}: {e:#}", self.id())))?,
        };
        validate(self.id(), value)
    }

    fn score_with_timeout(&self, runtime: &Runtime, limit: Duration, candidate: &str, reference: &str) -> Result<f64> {
        let scorer = Arc::clone(&self.scorer);
        let (candidate, reference) = (candidate.to_owned(), reference.to_owned());
        let (tx, rx) = mpsc::channel();
        // spawn rather than block_on: the caller may itself be on a tokio runtime
        runtime.spawn(async move {
            let joined = tokio::time::timeout(limit, tokio::task::spawn_blocking(move || scorer.similarity(&candidate, &reference))).await;
            let _ = tx.send(joined);
        });
        match rx.recv() {
            Err(_) => Err(Error::ScorerFailure(format!("{} dropped its result", self.id()))),
            Ok(Err(_)) => {
                debug!(scorer = self.id(), ?limit, "semantic scorer timed out");
                Err(Error::ScorerFailure(format!("{} timed out after {} ms", self.id(), limit.as_millis())))
            }
            Ok(Ok(Err(join))) => Err(Error::ScorerFailure(format!("{} aborted: {join}", self.id()))),
            Ok(Ok(Ok(Err(e)))) => Err(Error::ScorerFailure(format!("{}: {e:#}", self.id()))),
            Ok(Ok(Ok(Ok(value)))) => Ok(value),
        }
    }
}

impl Drop for ScorerAdapter {
    fn drop(&mut self) {
        // do not wait for abandoned calls
        if let Some(runtime) = self.runtime.take() { runtime.shutdown_background(); }
    }
}

fn validate(id: &str, value: f64) -> Result<f64> {
    if value.is_nan() {
        return Err(Error::ScorerFailure(format!("{id} returned NaN")));
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(Error::ScorerFailure(format!("{id} returned {value}, outside [0, 100]")));
    }
    Ok(value)
}
