//! Configuration loading and translator factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lettura_core::model::{Language, LanguagePair};
use lettura_core::retry::RetryPolicy;
use lettura_core::session::{SessionSettings, DEFAULT_QUIZ_SIZE};
use lettura_core::traits::Translator;

use crate::google::GoogleTranslator;
use crate::lastampa::NewsConfig;
use crate::libretranslate::LibreTranslator;

/// Which translation backend to use.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslatorConfig {
    Google {
        #[serde(default)]
        base_url: Option<String>,
    },
    LibreTranslate {
        #[serde(default = "default_libretranslate_url")]
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslatorConfig::Google { base_url } => f
                .debug_struct("Google")
                .field("base_url", base_url)
                .finish(),
            TranslatorConfig::LibreTranslate {
                base_url,
                api_key,
            } => f
                .debug_struct("LibreTranslate")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .finish(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig::Google { base_url: None }
    }
}

fn default_libretranslate_url() -> String {
    "http://localhost:5000".to_string()
}

/// Top-level lettura configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetturaConfig {
    #[serde(default)]
    pub translator: TranslatorConfig,
    /// Language the articles are written in.
    #[serde(default = "default_source_language")]
    pub source_language: Language,
    /// Language the learner answers in.
    #[serde(default = "default_target_language")]
    pub target_language: Language,
    /// Words per quiz.
    #[serde(default = "default_quiz_size")]
    pub quiz_size: usize,
    /// Retries after a failed translation.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Deadline for one translation call.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// JSON file holding quiz results.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub news: NewsConfig,
}

fn default_source_language() -> Language {
    Language::Italian
}
fn default_target_language() -> Language {
    Language::French
}
fn default_quiz_size() -> usize {
    DEFAULT_QUIZ_SIZE
}
fn default_retries() -> u32 {
    1
}
fn default_retry_delay() -> u64 {
    500
}
fn default_timeout() -> u64 {
    10
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./lettura-results.json")
}

impl Default for LetturaConfig {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig::default(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            quiz_size: default_quiz_size(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            timeout_secs: default_timeout(),
            store_path: default_store_path(),
            news: NewsConfig::default(),
        }
    }
}

impl LetturaConfig {
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(self.source_language, self.target_language)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            pair: self.pair(),
            quiz_size: self.quiz_size,
            retry: self.retry_policy(),
        }
    }

    /// Reject settings that would make every session useless.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.quiz_size >= 1, "quiz_size must be at least 1");
        anyhow::ensure!(self.timeout_secs >= 1, "timeout_secs must be at least 1");
        anyhow::ensure!(
            self.source_language != self.target_language,
            "source and target language must differ"
        );
        anyhow::ensure!(
            self.news.min_chars <= self.news.max_chars,
            "news.min_chars must not exceed news.max_chars"
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_translator_config(config: &TranslatorConfig) -> TranslatorConfig {
    match config {
        TranslatorConfig::Google { base_url } => TranslatorConfig::Google {
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        TranslatorConfig::LibreTranslate { base_url, api_key } => {
            TranslatorConfig::LibreTranslate {
                base_url: resolve_env_vars(base_url),
                api_key: api_key.as_ref().map(|k| resolve_env_vars(k)),
            }
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lettura.toml` in the current directory
/// 2. `~/.config/lettura/config.toml`
///
/// Environment variable override: `LETTURA_LIBRETRANSLATE_KEY`.
pub fn load_config() -> Result<LetturaConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LetturaConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lettura.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LetturaConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LetturaConfig::default(),
    };

    if let Ok(key) = std::env::var("LETTURA_LIBRETRANSLATE_KEY") {
        if let TranslatorConfig::LibreTranslate { api_key, .. } = &mut config.translator {
            *api_key = Some(key);
        }
    }

    config.translator = resolve_translator_config(&config.translator);
    config.validate()?;
    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lettura"))
}

/// Create a translator from its configuration.
pub fn create_translator(config: &TranslatorConfig) -> Result<Box<dyn Translator>> {
    match config {
        TranslatorConfig::Google { base_url } => {
            Ok(Box::new(GoogleTranslator::new(base_url.clone())?))
        }
        TranslatorConfig::LibreTranslate { base_url, api_key } => {
            Ok(Box::new(LibreTranslator::new(base_url, api_key.clone())?))
        }
    }
}

/// Starter config written by `lettura init`.
pub const STARTER_CONFIG: &str = r#"# lettura configuration

source_language = "italian"
target_language = "french"
quiz_size = 10

# Translation calls: one retry, 10 second deadline each.
max_retries = 1
retry_delay_ms = 500
timeout_secs = 10

store_path = "./lettura-results.json"

[translator]
type = "google"

# [translator]
# type = "libretranslate"
# base_url = "http://localhost:5000"
# api_key = "${LETTURA_LIBRETRANSLATE_KEY}"

[news]
base_url = "https://www.lastampa.it"
section = "/cronaca/"
min_chars = 3000
max_chars = 5000
max_candidates = 30
"#;
