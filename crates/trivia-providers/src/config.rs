//! Configuration loading and source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use trivia_core::engine::QuizEngineConfig;
use trivia_core::traits::{CustomQuestionSource, QuestionProvider};

use crate::fetcher::QuestionFetcher;
use crate::opentdb::{OpenTdbProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level trivia configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaConfig {
    /// Base URL of the question API (`/api.php` is appended).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// How long a fetched batch stays fresh.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Seconds allowed per question.
    #[serde(default = "default_time_limit")]
    pub question_time_limit_secs: u32,
    /// Pause after each answer before the next question.
    #[serde(default = "default_resolution_delay")]
    pub resolution_delay_ms: u64,
    /// Questions per quiz when neither the command line nor the profile says.
    #[serde(default = "default_amount")]
    pub default_amount: u32,
    /// Where persisted data lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_time_limit() -> u32 {
    30
}
fn default_resolution_delay() -> u64 {
    2000
}
fn default_amount() -> u32 {
    5
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./trivia-data")
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            question_time_limit_secs: default_time_limit(),
            resolution_delay_ms: default_resolution_delay(),
            default_amount: default_amount(),
            data_dir: default_data_dir(),
        }
    }
}

impl TriviaConfig {
    pub fn engine_config(&self) -> QuizEngineConfig {
        QuizEngineConfig {
            time_limit_secs: self.question_time_limit_secs,
            resolution_delay: Duration::from_millis(self.resolution_delay_ms),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
        from = start + value.len();
    }
    result
}

/// Load configuration from `path`, or from well-known paths.
///
/// Search order:
/// 1. `trivia.toml` in the current directory
/// 2. `~/.config/trivia/config.toml`
///
/// An explicit `path` skips the search and must exist.
///
/// Environment variable overrides: `TRIVIA_API_URL`, `TRIVIA_DATA_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<TriviaConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("trivia.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<TriviaConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => TriviaConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("TRIVIA_API_URL") {
        config.api_base_url = url;
    }
    if let Ok(dir) = std::env::var("TRIVIA_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.api_base_url = resolve_env_vars(&config.api_base_url);
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    anyhow::ensure!(
        config.default_amount >= 1,
        "default_amount must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("trivia"))
}

/// Create the remote question source from configuration.
pub fn create_source(config: &TriviaConfig) -> Arc<dyn QuestionProvider> {
    Arc::new(OpenTdbProvider::new(
        Some(config.api_base_url.clone()),
        config.request_timeout_secs,
    ))
}

/// Create a cached fetcher over the configured source.
pub fn create_fetcher(
    config: &TriviaConfig,
    custom: Arc<dyn CustomQuestionSource>,
) -> QuestionFetcher {
    QuestionFetcher::new(create_source(config), custom).with_ttl(config.cache_ttl())
}
