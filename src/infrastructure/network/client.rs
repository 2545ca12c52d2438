use crate::domain::error::{FailureReason, TtError};
use crate::domain::model::TranslationOutcome;
use crate::domain::traits::TranslationBackend;
use crate::infrastructure::config::RemoteConfig;
use crate::infrastructure::network::http::fill_template;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

// Definition endpoint response: { "<lang>": [ { "definitions": [ { "definition": "..." } ] } ] }
#[derive(Deserialize, Debug)]
struct Usage {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Deserialize, Debug)]
struct Definition {
    definition: String,
}

type DefinitionResponse = HashMap<String, Vec<Usage>>;

/// Remote lookup backend
///
/// Issues one GET per query against a URL template and extracts the
/// fragment for the configured target language.
pub struct RemoteBackend {
    client: Client,
    url_template: String,
    target_language: String,
}

impl RemoteBackend {
    pub fn new(client: Client, config: &RemoteConfig) -> Result<Self, TtError> {
        if !config.url_template.contains("{text}") {
            return Err(TtError::Config(format!(
                "Remote url_template must contain {{text}}: {}",
                config.url_template
            )));
        }
        Url::parse(&fill_template(&config.url_template, "probe")).map_err(|e| {
            TtError::Config(format!(
                "Invalid remote url_template '{}': {}",
                config.url_template, e
            ))
        })?;
        if config.target_language.trim().is_empty() {
            return Err(TtError::Config(
                "Remote target_language not configured".to_string(),
            ));
        }

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            target_language: config.target_language.trim().to_string(),
        })
    }

    async fn lookup(&self, text: &str) -> Result<String, FailureReason> {
        let url = fill_template(&self.url_template, text.trim());
        debug!(%url, "remote lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FailureReason::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FailureReason::NotFound);
        }
        if status.is_client_error() {
            return Err(FailureReason::Rejected(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(FailureReason::Unreachable(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FailureReason::Unreachable(e.to_string()))?;

        extract_translation(&body, &self.target_language)
    }
}

#[async_trait]
impl TranslationBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn translate(&self, text: &str, cancel: &CancellationToken) -> TranslationOutcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => TranslationOutcome::Cancelled,
            result = self.lookup(text) => {
                if cancel.is_cancelled() {
                    return TranslationOutcome::Cancelled;
                }
                match result {
                    Ok(translation) => TranslationOutcome::Success(translation),
                    Err(reason) => TranslationOutcome::Failure(reason),
                }
            }
        }
    }
}

/// Pull the first non-empty definition for `language` out of a response body.
pub fn extract_translation(body: &str, language: &str) -> Result<String, FailureReason> {
    let parsed: DefinitionResponse = serde_json::from_str(body)
        .map_err(|e| FailureReason::MalformedResponse(e.to_string()))?;

    parsed
        .get(language)
        .into_iter()
        .flatten()
        .flat_map(|usage| usage.definitions.iter())
        .map(|d| strip_html(&d.definition))
        .find(|d| !d.is_empty())
        .ok_or(FailureReason::NotFound)
}

/// Drop markup tags, decode the common entities and collapse whitespace.
fn strip_html(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
