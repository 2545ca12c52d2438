use crate::domain::error::{FailureReason, TtError};
use crate::domain::model::TranslationOutcome;
use crate::domain::traits::{StepModel, TranslationBackend};
use crate::infrastructure::config::LocalConfig;
use crate::infrastructure::pipeline::lexicon::LexiconModel;
use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Two-stage local translation: source → English, then English → target.
pub struct LocalPipeline {
    to_english: Arc<dyn StepModel>,
    from_english: Arc<dyn StepModel>,
}

impl LocalPipeline {
    pub fn new(to_english: Arc<dyn StepModel>, from_english: Arc<dyn StepModel>) -> Self {
        Self {
            to_english,
            from_english,
        }
    }

    /// Load both stages from their model directories.
    pub fn load(config: &LocalConfig) -> Result<Self, TtError> {
        let to_english = LexiconModel::load(&config.source_to_english)?;
        let from_english = LexiconModel::load(&config.english_to_target)?;
        info!(
            to_english = to_english.name(),
            from_english = from_english.name(),
            "local models loaded"
        );
        Ok(Self::new(Arc::new(to_english), Arc::new(from_english)))
    }
}

#[async_trait]
impl TranslationBackend for LocalPipeline {
    fn name(&self) -> &str {
        "local"
    }

    async fn translate(&self, text: &str, cancel: &CancellationToken) -> TranslationOutcome {
        if cancel.is_cancelled() {
            return TranslationOutcome::Cancelled;
        }

        let stages = [Arc::clone(&self.to_english), Arc::clone(&self.from_english)];
        let text = text.to_string();
        let token = cancel.clone();
        let job = tokio::task::spawn_blocking(move || run_stages(&stages, text, &token));

        // The job polls the token per output token, so this await is bounded
        // once cancellation fires.
        let result = match job.await {
            Ok(result) => result,
            Err(e) => {
                return TranslationOutcome::Failure(FailureReason::ModelRuntime(e.to_string()))
            }
        };

        if cancel.is_cancelled() {
            return TranslationOutcome::Cancelled;
        }

        match result {
            Ok(Some(output)) if output.trim().is_empty() => {
                TranslationOutcome::Failure(FailureReason::NotFound)
            }
            Ok(Some(output)) => TranslationOutcome::Success(output),
            Ok(None) => TranslationOutcome::Cancelled,
            Err(e) => TranslationOutcome::Failure(e.into()),
        }
    }

    fn release(&self) {
        debug!(
            to_english = self.to_english.name(),
            from_english = self.from_english.name(),
            "releasing local models"
        );
    }
}

fn run_stages(
    stages: &[Arc<dyn StepModel>],
    text: String,
    cancel: &CancellationToken,
) -> Result<Option<String>, TtError> {
    let mut current = text;
    for stage in stages {
        let mut on_step = |_: usize| {
            if cancel.is_cancelled() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        match stage.generate(&current, &mut on_step)? {
            Some(next) => current = next,
            None => {
                debug!(stage = stage.name(), "generation stopped by cancellation");
                return Ok(None);
            }
        }
    }
    Ok(Some(current))
}
