//! LibreTranslate provider (self-hosted or libretranslate.com).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lettura_core::model::Language;
use lettura_core::traits::Translator;
use lettura_core::TranslationError;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// LibreTranslate `/translate` client.
pub struct LibreTranslator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl LibreTranslator {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, TranslationError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslationError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }
}

#[derive(Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Deserialize)]
struct LibreError {
    error: String,
}

#[async_trait]
impl Translator for LibreTranslator {
    fn name(&self) -> &str {
        "libretranslate"
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let body = LibreRequest {
            q: text,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else if e.is_connect() {
                    TranslationError::Network(format!(
                        "LibreTranslate not reachable at {}",
                        self.base_url
                    ))
                } else {
                    TranslationError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(TranslationError::RateLimited {
                retry_after_ms: 60_000,
            });
        }
        if status >= 400 {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LibreError>(&raw)
                .map(|e| e.error)
                .unwrap_or(raw);
            return Err(match status {
                400 if message.to_lowercase().contains("not supported") => {
                    TranslationError::UnsupportedLanguage {
                        source_code: source.code().to_string(),
                        target_code: target.code().to_string(),
                    }
                }
                403 => TranslationError::AuthenticationFailed(message),
                _ => TranslationError::Api { status, message },
            });
        }

        let parsed: LibreResponse = response.json().await.map_err(|e| TranslationError::Api {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        if parsed.translated_text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse(text.to_string()));
        }
        Ok(parsed.translated_text)
    }
}
