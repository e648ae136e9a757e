//! Google Translate provider, using the public web endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::instrument;

use lettura_core::model::Language;
use lettura_core::traits::Translator;
use lettura_core::TranslationError;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Google Translate via `translate_a/single`.
pub struct GoogleTranslator {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new(base_url: Option<String>) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslationError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    fn request_url(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<Url, TranslationError> {
        Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| TranslationError::Network(format!("invalid translator url: {e}")))
    }
}

/// The response is a nested array; `[0]` lists segments whose first element
/// is the translated text.
fn parse_segments(body: &serde_json::Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|t| t.as_str()))
        .collect();
    Some(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let url = self.request_url(text, source, target)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                TranslationError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(TranslationError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::QuotaExceeded(body));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::Api { status, message });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| TranslationError::Api {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        match parse_segments(&body) {
            Some(t) if !t.trim().is_empty() => Ok(t),
            _ => Err(TranslationError::EmptyResponse(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn joins_translated_segments() {
        let server = MockServer::start().await;

        let body = serde_json::json!([
            [
                ["Bonjour. ", "Ciao. ", null, null, 10],
                ["Comment ça va ?", "Come stai?", null, null, 10]
            ],
            null,
            "it"
        ]);

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "it"))
            .and(query_param("tl", "fr"))
            .and(query_param("q", "Ciao. Come stai?"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Some(server.uri())).unwrap();
        let out = translator
            .translate("Ciao. Come stai?", Language::Italian, Language::French)
            .await
            .unwrap();
        assert_eq!(out, "Bonjour. Comment ça va ?");
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Some(server.uri())).unwrap();
        let err = translator
            .translate("gatto", Language::Italian, Language::French)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TranslationError::RateLimited {
                retry_after_ms: 2000
            }
        );
    }

    #[tokio::test]
    async fn forbidden_means_quota() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota"))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Some(server.uri())).unwrap();
        let err = translator
            .translate("gatto", Language::Italian, Language::French)
            .await
            .unwrap_err();
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn empty_translation_is_an_error() {
        let server = MockServer::start().await;

        let body = serde_json::json!([[], null, "it"]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Some(server.uri())).unwrap();
        let err = translator
            .translate("gatto", Language::Italian, Language::French)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::EmptyResponse(_)));
    }

    #[test]
    fn parse_rejects_unexpected_shapes() {
        assert_eq!(parse_segments(&serde_json::json!({"error": 1})), None);
        assert_eq!(
            parse_segments(&serde_json::json!([[["chat", "gatto"]]])),
            Some("chat".to_string())
        );
    }
}
