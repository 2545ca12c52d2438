use crate::domain::error::TtError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Inputs shorter than this (in characters) clear the results instead of
    /// being translated. Unset means the backend's own default.
    pub min_query_chars: Option<usize>,
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
    pub browser: Option<String>,
    pub http_proxy: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl BackendKind {
    pub fn default_min_query_chars(self) -> usize {
        match self {
            BackendKind::Local => 3,
            BackendKind::Remote => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocalConfig {
    #[serde(default = "default_source_to_english")]
    pub source_to_english: PathBuf,
    #[serde(default = "default_english_to_target")]
    pub english_to_target: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_url_template")]
    pub url_template: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            source_to_english: default_source_to_english(),
            english_to_target: default_english_to_target(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            target_language: default_target_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            capacity: default_cache_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: None,
            lookup_url: default_lookup_url(),
            browser: None,
            http_proxy: None,
            theme: default_theme(),
            enable_emoji: true,
            backend: BackendConfig::default(),
            cache: CacheConfig::default(),
            logging: Logging::default(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn effective_min_query_chars(&self) -> usize {
        self.min_query_chars
            .unwrap_or_else(|| self.backend.kind.default_min_query_chars())
    }
}

// Defaults
fn default_debounce_ms() -> u64 {
    500
}
fn default_lookup_url() -> String {
    "https://dict.youdao.com/result?word={text}&lang=en".to_string()
}
fn default_theme() -> String {
    "temp".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_cache_capacity() -> usize {
    1024
}
fn default_url_template() -> String {
    "https://en.wiktionary.org/api/rest_v1/page/definition/{text}".to_string()
}
fn default_target_language() -> String {
    "zh".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_source_to_english() -> PathBuf {
    models_dir().join("opus_mul_en")
}
fn default_english_to_target() -> PathBuf {
    models_dir().join("opus_en_zh")
}

/// Model directory: ~/.local/share/tt/models (Linux)
pub fn models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tt")
        .join("models")
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tt").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<Config, TtError> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn load_config() -> Result<Config, TtError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), TtError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| TtError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| TtError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(TtError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.effective_min_query_chars(), 3);
        assert!(config.cache.enable);
        assert_eq!(config.logging.level, "WARN");
    }

    #[test]
    fn remote_backend_lowers_min_length() {
        let config = parse_config(
            r#"
[backend]
kind = "remote"

[backend.remote]
target_language = "fr"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.kind, BackendKind::Remote);
        assert_eq!(config.backend.remote.target_language, "fr");
        assert_eq!(config.backend.remote.timeout_secs, 10);
        assert_eq!(config.effective_min_query_chars(), 1);
    }

    #[test]
    fn explicit_min_length_wins() {
        let config = parse_config("min_query_chars = 0\ndebounce_ms = 250").unwrap();
        assert_eq!(config.effective_min_query_chars(), 0);
        assert_eq!(config.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn unknown_backend_kind_is_rejected() {
        let err = parse_config("[backend]\nkind = \"carrier-pigeon\"").unwrap_err();
        assert!(matches!(err, TtError::Toml(_)));
    }
}
