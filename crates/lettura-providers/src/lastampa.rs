//! La Stampa news source.
//!
//! Walks the section links on the home page and returns the first article
//! whose body length falls inside the configured window.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lettura_core::model::Article;
use lettura_core::traits::ArticleSource;
use lettura_core::FetchError;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const UNTITLED: &str = "Untitled";

/// Where to look for articles and which ones qualify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Only links whose href contains this marker are visited.
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Upper bound on article pages fetched per call.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_base_url() -> String {
    "https://www.lastampa.it".to_string()
}
fn default_section() -> String {
    "/cronaca/".to_string()
}
fn default_min_chars() -> usize {
    3000
}
fn default_max_chars() -> usize {
    5000
}
fn default_max_candidates() -> usize {
    30
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            section: default_section(),
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            max_candidates: default_max_candidates(),
        }
    }
}

/// Fetches articles from La Stampa (or any site with the same markup).
pub struct LaStampaSource {
    config: NewsConfig,
    client: reqwest::Client,
}

impl LaStampaSource {
    pub fn new(config: NewsConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("{url}: HTTP {}", status.as_u16())));
        }
        response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("{url}: {e}")))
    }

    fn qualifies(&self, body: &str) -> bool {
        let len = body.chars().count();
        (self.config.min_chars..=self.config.max_chars).contains(&len)
    }
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Network(format!("bad selector {css}: {e}")))
}

/// Absolute, deduplicated links to section articles, in page order.
fn article_links(html: &str, base_url: &str, section: &str) -> Result<Vec<String>, FetchError> {
    let base = Url::parse(base_url)
        .map_err(|e| FetchError::Network(format!("invalid base url {base_url}: {e}")))?;
    let anchors = selector("a[href]")?;
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let links = document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(section))
        .filter_map(|href| base.join(href).ok())
        .map(String::from)
        .filter(|url| seen.insert(url.clone()))
        .collect();
    Ok(links)
}

/// Title (`h1`) and body (paragraphs of `div.story__text`) of an article page.
///
/// Returns `None` when the page has no story container.
fn parse_article(html: &str) -> Result<Option<(String, String)>, FetchError> {
    let heading = selector("h1")?;
    let story = selector("div.story__text")?;
    let paragraph = selector("p")?;
    let document = Html::parse_document(html);

    let Some(container) = document.select(&story).next() else {
        return Ok(None);
    };

    let title = document
        .select(&heading)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    // Paragraph text is kept verbatim; the length window is measured on it.
    let body = container
        .select(&paragraph)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Some((title, body)))
}

#[async_trait]
impl ArticleSource for LaStampaSource {
    fn name(&self) -> &str {
        "lastampa"
    }

    #[instrument(skip(self), fields(base = %self.config.base_url))]
    async fn fetch_article(&self) -> Result<Article, FetchError> {
        let home = self.get_html(&self.config.base_url).await?;
        let links = article_links(&home, &self.config.base_url, &self.config.section)?;
        tracing::debug!(candidates = links.len(), "collected article links");

        for link in links.into_iter().take(self.config.max_candidates) {
            let page = match self.get_html(&link).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("skipping article: {e}");
                    continue;
                }
            };
            let Some((title, body)) = parse_article(&page)? else {
                continue;
            };
            if self.qualifies(&body) {
                tracing::info!(url = %link, chars = body.chars().count(), "article selected");
                return Ok(Article::new(title, link, body));
            }
            tracing::debug!(url = %link, chars = body.chars().count(), "article outside length window");
        }

        Err(FetchError::NotFound)
    }
}
