//! Scrape timing, bounds and page-structure configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scrape::{LabelMatcher, Selectors};

/// Default directory for saved channel reports.
pub const DEFAULT_OUTPUT_DIR: &str = "channels";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Quiet-network window after navigation before reading the page.
    pub network_idle_ms: u64,
    /// Ceiling on the wait for the about panel to render.
    pub about_settle_ms: u64,
    /// Ceiling on the wait for the first listing entries after opening the tab.
    pub tab_settle_ms: u64,
    /// Ceiling on the wait for new entries after each scroll.
    pub scroll_settle_ms: u64,
    /// Minimum wait after a scroll before trusting an absent loading indicator.
    pub min_scroll_settle_ms: u64,
    pub poll_interval_ms: u64,

    /// Deadline for the whole metadata phase, navigation included.
    pub metadata_deadline_secs: u64,
    pub navigation_deadline_secs: u64,
    pub tab_deadline_secs: u64,
    /// Deadline for a single scroll-and-resample iteration.
    pub scroll_deadline_secs: u64,

    /// Upper bound on scroll iterations, even if the listing keeps growing.
    pub max_scroll_iterations: u32,

    pub about_tab: LabelMatcher,
    pub videos_tab: LabelMatcher,
    pub selectors: Selectors,

    /// Directory for saved reports (relative paths resolve against the CWD).
    pub output_dir: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            network_idle_ms: 500,
            about_settle_ms: 3_000,
            tab_settle_ms: 3_000,
            scroll_settle_ms: 3_000,
            min_scroll_settle_ms: 1_000,
            poll_interval_ms: 100,
            metadata_deadline_secs: 90,
            navigation_deadline_secs: 60,
            tab_deadline_secs: 30,
            scroll_deadline_secs: 30,
            max_scroll_iterations: 500,
            about_tab: LabelMatcher::about(),
            videos_tab: LabelMatcher::videos(),
            selectors: Selectors::default(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn about_settle(&self) -> Duration {
        Duration::from_millis(self.about_settle_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn min_scroll_settle(&self) -> Duration {
        Duration::from_millis(self.min_scroll_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn metadata_deadline(&self) -> Duration {
        Duration::from_secs(self.metadata_deadline_secs)
    }

    pub fn navigation_deadline(&self) -> Duration {
        Duration::from_secs(self.navigation_deadline_secs)
    }

    pub fn tab_deadline(&self) -> Duration {
        Duration::from_secs(self.tab_deadline_secs)
    }

    pub fn scroll_deadline(&self) -> Duration {
        Duration::from_secs(self.scroll_deadline_secs)
    }

    /// Check that every settle ceiling fits inside its phase deadline.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than zero".to_string());
        }
        if self.min_scroll_settle_ms > self.scroll_settle_ms {
            return Err(format!(
                "min_scroll_settle_ms ({}) exceeds scroll_settle_ms ({})",
                self.min_scroll_settle_ms, self.scroll_settle_ms
            ));
        }
        if self.scroll_settle() >= self.scroll_deadline() {
            return Err("scroll_settle_ms must be shorter than scroll_deadline_secs".to_string());
        }
        if self.tab_settle() >= self.tab_deadline() {
            return Err("tab_settle_ms must be shorter than tab_deadline_secs".to_string());
        }
        if self.about_settle() >= self.metadata_deadline() {
            return Err("about_settle_ms must be shorter than metadata_deadline_secs".to_string());
        }
        Ok(())
    }

    /// Settings with near-zero waits, for driving the in-memory page.
    #[cfg(test)]
    pub(crate) fn immediate() -> Self {
        Self {
            network_idle_ms: 0,
            about_settle_ms: 0,
            tab_settle_ms: 0,
            scroll_settle_ms: 0,
            min_scroll_settle_ms: 0,
            poll_interval_ms: 1,
            ..Self::default()
        }
    }
}
