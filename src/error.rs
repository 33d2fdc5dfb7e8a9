// src/error.rs

use thiserror::Error;

/// Scrape failures. All of these are fatal to the session traversal that
/// hit them: a structure mismatch means the source markup changed, and
/// anything scraped past it could be silently wrong.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("unexpected page structure at {url}: {what}")]
    Structure { url: String, what: String },

    #[error("unknown vote code {code:?} at {url}")]
    UnknownVoteCode { url: String, code: char },
}

impl ScrapeError {
    pub fn fetch(url: &str, reason: &str) -> Self {
        Self::Fetch { url: s!(url), reason: s!(reason) }
    }

    pub fn structure(url: &str, what: &str) -> Self {
        Self::Structure { url: s!(url), what: s!(what) }
    }
}
