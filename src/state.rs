use crate::domain::error::TtError;
use crate::domain::traits::TranslationBackend;
use crate::infrastructure::config::{BackendKind, Config};
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::RemoteBackend;
use crate::infrastructure::pipeline::LocalPipeline;
use crate::infrastructure::storage::CachedBackend;
use reqwest::Client;
use std::sync::Arc;

/// Process-scoped resources shared by the session
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, TtError> {
        let http_client = create_client(&config)?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    /// Construct the configured translation backend.
    ///
    /// Errors here are construction-time conditions; callers are expected to
    /// fall back to a degraded controller rather than abort.
    pub fn build_backend(&self) -> Result<Arc<dyn TranslationBackend>, TtError> {
        let backend: Arc<dyn TranslationBackend> = match self.config.backend.kind {
            BackendKind::Local => Arc::new(LocalPipeline::load(&self.config.backend.local)?),
            BackendKind::Remote => Arc::new(RemoteBackend::new(
                self.http_client.clone(),
                &self.config.backend.remote,
            )?),
        };

        if self.config.cache.enable {
            return Ok(Arc::new(CachedBackend::new(
                backend,
                self.config.cache.capacity,
            )));
        }
        Ok(backend)
    }
}
