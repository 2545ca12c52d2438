use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Start-up error: {0}")]
    Init(String),

    #[error("Model assets missing: {0}")]
    ModelAssets(String),

    #[error("Model runtime error: {0}")]
    ModelRuntime(String),
}

/// Why a single lookup produced no translation.
///
/// These are per-query conditions: they are rendered as a diagnostic item
/// and never escalate past the controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("Translation service unreachable: {0}")]
    Unreachable(String),

    #[error("Translation service rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed response from translation service: {0}")]
    MalformedResponse(String),

    #[error("No translation found")]
    NotFound,

    #[error("Translation model error: {0}")]
    ModelRuntime(String),

    #[error("Translation unavailable: {0}")]
    Unavailable(String),
}

impl From<TtError> for FailureReason {
    fn from(err: TtError) -> Self {
        match err {
            TtError::Http(e) => FailureReason::Unreachable(e.to_string()),
            TtError::Json(e) => FailureReason::MalformedResponse(e.to_string()),
            TtError::ModelRuntime(msg) => FailureReason::ModelRuntime(msg),
            TtError::ModelAssets(msg) | TtError::Config(msg) | TtError::Init(msg) => {
                FailureReason::Unavailable(msg)
            }
            other => FailureReason::ModelRuntime(other.to_string()),
        }
    }
}
