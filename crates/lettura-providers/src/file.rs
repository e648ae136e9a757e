//! Local text-file article source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use lettura_core::model::Article;
use lettura_core::traits::ArticleSource;
use lettura_core::FetchError;

/// Reads an article from a UTF-8 text file.
///
/// The first non-empty line is the title; the remaining lines form the body.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Split file contents into `(title, body)`.
pub fn split_title(contents: &str) -> (String, String) {
    let mut lines = contents.lines().skip_while(|l| l.trim().is_empty());
    let title = lines.next().unwrap_or_default().trim().to_string();
    let body = lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (title, body)
}

#[async_trait]
impl ArticleSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_article(&self) -> Result<Article, FetchError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let (title, body) = split_title(&contents);
        if body.is_empty() {
            return Err(FetchError::NotFound);
        }
        let url = format!("file://{}", self.path.display());
        Ok(Article::new(title, url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_non_empty_line() {
        let (title, body) = split_title("\n  Il gatto  \nPrimo paragrafo.\n\nSecondo paragrafo.\n");
        assert_eq!(title, "Il gatto");
        assert_eq!(body, "Primo paragrafo. Secondo paragrafo.");
    }

    #[tokio::test]
    async fn reads_article_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articolo.txt");
        std::fs::write(&path, "Titolo\nIl gatto mangia il pesce.").unwrap();

        let article = FileSource::new(&path).fetch_article().await.unwrap();
        assert_eq!(article.title, "Titolo");
        assert_eq!(article.body, "Il gatto mangia il pesce.");
        assert!(article.source_url.starts_with("file://"));
    }

    #[tokio::test]
    async fn title_only_file_has_no_article() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vuoto.txt");
        std::fs::write(&path, "Solo titolo\n").unwrap();

        let err = FileSource::new(&path).fetch_article().await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = FileSource::new("/definitely/not/here.txt")
            .fetch_article()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
