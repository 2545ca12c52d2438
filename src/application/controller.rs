use crate::application::sequencer::{Lookup, Sequencer};
use crate::domain::error::{FailureReason, TtError};
use crate::domain::model::{Action, Query, ResultItem, TranslationOutcome};
use crate::domain::traits::{ResultSink, TranslationBackend};
use crate::infrastructure::config::Config;
use crate::infrastructure::network::http::fill_template;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Tunables fixed at construction time
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub debounce: Duration,
    /// Trimmed inputs with fewer characters than this clear the results.
    pub min_query_chars: usize,
    /// URL template (`{text}`) attached to successful items as an action.
    pub lookup_url: Option<String>,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_chars: config.effective_min_query_chars(),
            lookup_url: Some(config.lookup_url.clone()).filter(|url| !url.is_empty()),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

struct ControllerState {
    generation: u64,
    cancel: CancellationToken,
    results: Vec<ResultItem>,
    loading: bool,
    closed: bool,
}

enum BackendSlot {
    Ready(Arc<dyn TranslationBackend>),
    Unavailable(String),
}

struct Inner {
    state: Mutex<ControllerState>,
    sequencer: Sequencer,
    backend: BackendSlot,
    sink: Arc<dyn ResultSink>,
    settings: ControllerSettings,
    released: AtomicBool,
}

/// Incremental query controller
///
/// Feed it every change of the search text with [`on_input_changed`]. Each
/// change gets a new generation number; only the newest generation is ever
/// allowed to reach the [`ResultSink`]. The generation check and the publish
/// happen under the same lock, so a result can never overtake a newer input.
///
/// The sink is called while that lock is held and must not call back into
/// the controller.
///
/// [`on_input_changed`]: QueryController::on_input_changed
pub struct QueryController {
    inner: Arc<Inner>,
    runtime: Handle,
}

impl QueryController {
    /// Must be called from within a tokio runtime; lookups are spawned on it.
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        sink: Arc<dyn ResultSink>,
        settings: ControllerSettings,
    ) -> Result<Self, TtError> {
        info!(backend = backend.name(), "query controller ready");
        Self::with_slot(BackendSlot::Ready(backend), sink, settings)
    }

    /// A controller whose every non-empty query yields a fixed
    /// "translation unavailable" item.
    pub fn degraded(
        reason: impl Into<String>,
        sink: Arc<dyn ResultSink>,
        settings: ControllerSettings,
    ) -> Result<Self, TtError> {
        let reason = reason.into();
        warn!(%reason, "translation backend unavailable, running degraded");
        Self::with_slot(BackendSlot::Unavailable(reason), sink, settings)
    }

    /// Build from the result of backend construction, degrading on failure.
    pub fn from_backend(
        backend: Result<Arc<dyn TranslationBackend>, TtError>,
        sink: Arc<dyn ResultSink>,
        settings: ControllerSettings,
    ) -> Result<Self, TtError> {
        match backend {
            Ok(backend) => Self::new(backend, sink, settings),
            Err(e) => Self::degraded(e.to_string(), sink, settings),
        }
    }

    fn with_slot(
        backend: BackendSlot,
        sink: Arc<dyn ResultSink>,
        settings: ControllerSettings,
    ) -> Result<Self, TtError> {
        let runtime = Handle::try_current()
            .map_err(|e| TtError::Init(format!("no async runtime available: {}", e)))?;

        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ControllerState {
                    generation: 0,
                    cancel: CancellationToken::new(),
                    results: vec![ResultItem::placeholder()],
                    loading: false,
                    closed: false,
                }),
                sequencer: Sequencer::new(settings.debounce),
                backend,
                sink,
                settings,
                released: AtomicBool::new(false),
            }),
            runtime,
        })
    }

    /// Handle one change of the search text. Never blocks on the backend.
    pub fn on_input_changed(&self, old_text: &str, new_text: &str) {
        if old_text == new_text {
            return;
        }

        let mut state = self.inner.lock();
        if state.closed {
            return;
        }

        state.generation += 1;
        let generation = state.generation;
        self.inner.sequencer.advance(generation);
        state.cancel.cancel();
        state.cancel = CancellationToken::new();

        let trimmed = new_text.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.inner.settings.min_query_chars {
            debug!(generation, "input too short, showing placeholder");
            state.results = vec![ResultItem::placeholder()];
            state.loading = false;
            self.inner.publish(&state);
            return;
        }

        let backend = match &self.inner.backend {
            BackendSlot::Ready(backend) => Arc::clone(backend),
            BackendSlot::Unavailable(reason) => {
                state.results = vec![ResultItem::diagnostic(&FailureReason::Unavailable(
                    reason.clone(),
                ))];
                state.loading = false;
                self.inner.publish(&state);
                return;
            }
        };

        state.loading = true;
        self.inner.sink.set_loading(true);

        let text = new_text.to_string();
        let query = Query {
            text: text.clone(),
            generation,
        };
        let cancel = state.cancel.clone();
        drop(state);

        debug!(generation, "scheduling debounced lookup");
        let inner = Arc::clone(&self.inner);
        self.runtime.spawn(async move {
            let lookup = AssertUnwindSafe(inner.sequencer.schedule_lookup(
                query,
                backend.as_ref(),
                &cancel,
            ))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Lookup {
                generation,
                outcome: TranslationOutcome::Failure(FailureReason::ModelRuntime(
                    "translation backend panicked".to_string(),
                )),
            });
            inner.complete(lookup, &text);
        });
    }

    /// Snapshot of the last published results
    pub fn results(&self) -> Vec<ResultItem> {
        self.inner.lock().results.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.inner.backend, BackendSlot::Unavailable(_))
    }

    pub fn debounce(&self) -> Duration {
        self.inner.sequencer.quiet_period()
    }

    /// Cancel the live request and release the backend. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut state = self.inner.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.cancel.cancel();
        }
        self.inner.release_backend();
    }
}

impl Drop for QueryController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ControllerState) {
        self.sink.set_results(state.results.clone());
        self.sink.set_loading(state.loading);
        self.sink.notify_results_changed();
    }

    fn complete(&self, lookup: Lookup, text: &str) {
        let mut state = self.lock();
        if state.closed || lookup.generation != state.generation {
            debug!(
                generation = lookup.generation,
                current = state.generation,
                "discarding stale lookup"
            );
            return;
        }

        let item = match lookup.outcome {
            TranslationOutcome::Cancelled => {
                debug!(generation = lookup.generation, "lookup cancelled");
                return;
            }
            TranslationOutcome::Success(translation) => {
                ResultItem::translation(translation, self.action_for(text))
            }
            TranslationOutcome::Failure(reason) => {
                warn!(generation = lookup.generation, %reason, "lookup failed");
                ResultItem::diagnostic(&reason)
            }
        };

        state.results = vec![item];
        state.loading = false;
        self.publish(&state);
    }

    fn action_for(&self, text: &str) -> Option<Action> {
        let template = self.settings.lookup_url.as_deref()?;
        Some(Action::OpenUrl(fill_template(template, text.trim())))
    }

    fn release_backend(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        if let BackendSlot::Ready(backend) = &self.backend {
            info!(backend = backend.name(), "releasing translation backend");
            backend.release();
        }
    }
}
