//! Document text extraction — pluggable, trait-based.
//!
//! Default: `DocumentExtractor` (PDF via `pdf-extract`, anything else read as UTF-8).
//! Carried in `AppState` as `Arc<dyn TextExtractor>`.
//!
//! PDF parsing is CPU-bound and can hang or panic on hostile input, so it runs inside
//! `tokio::task::spawn_blocking` under a `tokio::time::timeout`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Extraction task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Sniffs the `%PDF-` magic, tolerating leading whitespace.
    pub fn sniff(bytes: &[u8]) -> Self {
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        if bytes[start..].starts_with(b"%PDF-") {
            DocumentKind::Pdf
        } else {
            DocumentKind::PlainText
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

pub struct DocumentExtractor {
    timeout: Duration,
}

impl DocumentExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        match DocumentKind::sniff(&document) {
            DocumentKind::PlainText => Ok(String::from_utf8_lossy(&document).into_owned()),
            DocumentKind::Pdf => {
                run_bounded(self.timeout, move || extract_pdf_sync(&document)).await
            }
        }
    }
}

/// Runs a parser on the blocking pool. The caller stops waiting after `timeout`; a panic
/// inside the parser surfaces as `Aborted`.
pub async fn run_bounded<F>(timeout: Duration, parse: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(parse);
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ExtractionError::Aborted(e.to_string())),
        Err(_) => Err(ExtractionError::Timeout(timeout)),
    }
}

fn extract_pdf_sync(bytes: &[u8]) -> Result<String, ExtractionError> {
    pages_or_whole(pdf_extract::extract_text_from_mem_by_pages(bytes), || {
        pdf_extract::extract_text_from_mem(bytes)
    })
}

/// Page-by-page text, skipping blank pages. If the per-page pass failed the whole
/// document is tried in one pass before giving up.
fn pages_or_whole<E: std::fmt::Display>(
    pages: Result<Vec<String>, E>,
    whole: impl FnOnce() -> Result<String, E>,
) -> Result<String, ExtractionError> {
    match pages {
        Ok(pages) => {
            let total = pages.len();
            let text = join_pages(pages);
            debug!(pages = total, chars = text.len(), "Extracted PDF text");
            Ok(text)
        }
        Err(page_err) => {
            warn!(error = %page_err, "Per-page PDF extraction failed; retrying whole document");
            whole().map_err(|e| ExtractionError::Pdf(e.to_string()))
        }
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_pdf_magic() {
        assert_eq!(DocumentKind::sniff(b"%PDF-1.7\n..."), DocumentKind::Pdf);
        assert_eq!(DocumentKind::sniff(b"\n  %PDF-1.4"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::sniff(b"Jane Doe, Python"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::sniff(b""), DocumentKind::PlainText);
    }

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let pages = vec![
            "Page one".to_string(),
            "   \n".to_string(),
            "Page three".to_string(),
        ];
        assert_eq!(join_pages(pages), "Page one\nPage three");
    }

    #[tokio::test]
    async fn test_plain_text_passthrough() {
        let extractor = DocumentExtractor::new(Duration::from_secs(1));
        let text = extractor
            .extract(Bytes::from_static(b"Python and SQL"))
            .await
            .unwrap();
        assert_eq!(text, "Python and SQL");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy_not_error() {
        let extractor = DocumentExtractor::new(Duration::from_secs(1));
        let text = extractor
            .extract(Bytes::from_static(b"sql \xff docker"))
            .await
            .unwrap();
        assert!(text.starts_with("sql "));
        assert!(text.ends_with(" docker"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_reports_error() {
        let extractor = DocumentExtractor::new(Duration::from_secs(5));
        let result = extractor
            .extract(Bytes::from_static(b"%PDF-1.4\nthis is not really a pdf"))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_whole_document_retry_after_page_failure() {
        let text = pages_or_whole(Err("bad page tree"), || Ok("Python SQL".to_string()));
        assert_eq!(text.unwrap(), "Python SQL");

        let failed = pages_or_whole::<&str>(Err("bad page tree"), || Err("no trailer"));
        assert!(matches!(failed, Err(ExtractionError::Pdf(msg)) if msg == "no trailer"));

        let paged = pages_or_whole::<&str>(
            Ok(vec!["One".to_string(), String::new()]),
            || panic!("whole-document pass must not run"),
        );
        assert_eq!(paged.unwrap(), "One");
    }

    #[tokio::test]
    async fn test_slow_parse_times_out() {
        let result = run_bounded(Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
            Ok("too late".to_string())
        })
        .await;
        assert!(matches!(
            result,
            Err(ExtractionError::Timeout(t)) if t == Duration::from_millis(20)
        ));
    }

    #[tokio::test]
    async fn test_parser_panic_is_aborted() {
        let result = run_bounded(Duration::from_secs(5), || panic!("malformed xref")).await;
        assert!(matches!(result, Err(ExtractionError::Aborted(_))));
    }
}
