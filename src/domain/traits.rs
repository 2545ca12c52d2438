use crate::domain::error::TtError;
use crate::domain::model::{ResultItem, TranslationOutcome};
use async_trait::async_trait;
use std::ops::ControlFlow;
use tokio_util::sync::CancellationToken;

/// Trait for translation services
///
/// Implementations must poll `cancel` often enough that a cancelled call
/// resolves as `TranslationOutcome::Cancelled` without reporting partial
/// output. The same instance is reused for every query of a session and must
/// accept a new call right after a cancelled one.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Short name used in logs and `--status`
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, cancel: &CancellationToken) -> TranslationOutcome;

    /// Release held resources. Called once when the controller is torn down.
    fn release(&self) {}
}

/// Display surface fed by the controller.
///
/// Calls may arrive from runtime worker threads.
pub trait ResultSink: Send + Sync {
    fn set_results(&self, items: Vec<ResultItem>);

    fn set_loading(&self, loading: bool);

    fn notify_results_changed(&self);
}

/// A sequence-to-sequence model that produces output one token at a time.
///
/// `on_step` is invoked after every emitted token with the number of tokens
/// produced so far; returning `ControlFlow::Break(())` stops generation, in
/// which case `Ok(None)` is returned.
pub trait StepModel: Send + Sync {
    fn name(&self) -> &str;

    fn generate(
        &self,
        text: &str,
        on_step: &mut dyn FnMut(usize) -> ControlFlow<()>,
    ) -> Result<Option<String>, TtError>;
}
