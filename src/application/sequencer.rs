use crate::domain::model::{Query, TranslationOutcome};
use crate::domain::traits::TranslationBackend;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one scheduled lookup, tagged with the generation it ran for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub generation: u64,
    pub outcome: TranslationOutcome,
}

impl Lookup {
    fn cancelled(generation: u64) -> Self {
        Self {
            generation,
            outcome: TranslationOutcome::Cancelled,
        }
    }
}

/// Debounces lookups: backend work only starts once the input has been
/// quiet for `quiet_period` and no newer generation has been seen.
#[derive(Debug)]
pub struct Sequencer {
    quiet_period: Duration,
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            latest: AtomicU64::new(0),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Mark `generation` as seen; older scheduled lookups become stale.
    pub fn advance(&self, generation: u64) {
        self.latest.fetch_max(generation, Ordering::SeqCst);
    }

    pub async fn schedule_lookup(
        &self,
        query: Query,
        backend: &dyn TranslationBackend,
        cancel: &CancellationToken,
    ) -> Lookup {
        let generation = query.generation;
        self.advance(generation);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(generation, "cancelled during quiet period");
                return Lookup::cancelled(generation);
            }
            _ = tokio::time::sleep(self.quiet_period) => {}
        }

        if self.latest() != generation || cancel.is_cancelled() {
            debug!(generation, latest = self.latest(), "superseded, skipping backend");
            return Lookup::cancelled(generation);
        }

        debug!(generation, backend = backend.name(), "starting lookup");
        let outcome = backend.translate(&query.text, cancel).await;
        if cancel.is_cancelled() {
            return Lookup::cancelled(generation);
        }

        Lookup {
            generation,
            outcome,
        }
    }
}
