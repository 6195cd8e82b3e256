//! Scrape error types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Scrape phase, used to report which deadline was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Channel metadata extraction (navigation included).
    Metadata,
    /// Re-navigation to the channel root before pagination.
    Navigation,
    /// Clicking the videos tab and waiting for the first items.
    TabActivation,
    /// One scroll-and-resample iteration of the collector.
    ScrollIteration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => write!(f, "metadata extraction"),
            Self::Navigation => write!(f, "navigation"),
            Self::TabActivation => write!(f, "tab activation"),
            Self::ScrollIteration => write!(f, "scroll iteration"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },
    #[error("Browser protocol error: {0}")]
    Browser(String),
    #[error("{phase} exceeded its deadline of {}s", .limit.as_secs_f64())]
    DeadlineExceeded { phase: Phase, limit: Duration },
    #[error("Resource filter is already attached to this page")]
    FilterAlreadyAttached,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Whether this error is a deadline overrun rather than a hard failure.
    pub fn is_deadline(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
