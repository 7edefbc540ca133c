//! Error types for the spider.
//!
//! Per-fund errors ([`SpiderError::Network`], [`SpiderError::NotFound`],
//! [`SpiderError::Parse`], ...) are isolated by the fetch loop; only I/O on the
//! output files and [`TemplateError`] are fatal to a run.

use crate::holdings::HoldingsDocument;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpiderError {
    /// Connection, timeout or body errors from the HTTP client. Retried.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP 429. Retried after the longer rate limit backoff.
    #[error("rate limited at {0}")]
    RateLimited(String),

    /// HTTP 404. For a submissions index this means the fund has no filings.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status. Retried for 5xx only.
    #[error("HTTP {status} at {url}")]
    Http { status: u16, url: String },

    /// Upstream returned something we could not make sense of.
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SpiderError {
    pub fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        SpiderError::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpiderError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a single retry after a backoff may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SpiderError::Network(_) | SpiderError::RateLimited(_) => true,
            SpiderError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("placeholder {0} not found in template")]
    PlaceholderMissing(&'static str),

    #[error("placeholder {placeholder} appears {count} times in template, expected once")]
    PlaceholderRepeated {
        placeholder: &'static str,
        count: usize,
    },
}

/// One fund that could not be retrieved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundFailure {
    pub cik: String,
    pub name: String,
    pub error: String,
}

/// Returned by [`crate::fetch`] when at least one fund failed.
///
/// The document is still complete for every other fund; failed funds are present
/// with [`crate::SnapshotStatus::Failed`] so the caller can publish it regardless.
#[derive(Debug)]
pub struct PartialFailure {
    pub document: HoldingsDocument,
    pub failures: Vec<FundFailure>,
}

impl PartialFailure {
    pub fn ciks(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.cik.as_str()).collect()
    }

    pub fn into_document(self) -> HoldingsDocument {
        self.document
    }
}

impl std::fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} fund(s) could not be retrieved: {}",
            self.failures.len(),
            self.ciks().join(", ")
        )
    }
}

impl std::error::Error for PartialFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(SpiderError::RateLimited("u".into()).is_transient());
        assert!(SpiderError::Http {
            status: 503,
            url: "u".into()
        }
        .is_transient());
        assert!(!SpiderError::Http {
            status: 403,
            url: "u".into()
        }
        .is_transient());
        assert!(!SpiderError::NotFound("u".into()).is_transient());
        assert!(!SpiderError::parse("xml", "bad").is_transient());
    }
}
