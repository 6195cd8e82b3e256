//! Structured progress events emitted while scraping.
//!
//! Components receive an [`EventSink`] rather than printing status directly,
//! so the scrape flow can be observed (or asserted on in tests) without
//! capturing process output.

#[cfg(test)]
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::scrape::CollectionStop;

/// A single progress or diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    Navigating { url: String },
    SearchingMetadata,
    ChannelNotFound,
    MetadataExtracted { channel_name: String },
    AboutTabMissing,
    AboutPanelTimedOut,
    SearchingVideos { target: usize },
    VideosTabNotFound,
    ListingTimedOut,
    Scrolled { iteration: u32, items: usize },
    /// The listing neither grew nor finished loading within the settle window.
    ScrollSettleTimedOut { iteration: u32 },
    CollectionFinished { collected: usize, stop: CollectionStop },
    VideosMapped { count: usize },
}

/// Receiver for scrape events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::Navigating { url } => debug!("Navigating to {}", url),
            ScrapeEvent::SearchingMetadata => info!("Searching for key information..."),
            ScrapeEvent::ChannelNotFound => warn!("Channel not found"),
            ScrapeEvent::MetadataExtracted { channel_name } => {
                info!("Key information obtained for {}", channel_name)
            }
            ScrapeEvent::AboutTabMissing => debug!("No about tab; skipping about fields"),
            ScrapeEvent::AboutPanelTimedOut => {
                warn!("About panel did not render in time; fields may be missing")
            }
            ScrapeEvent::SearchingVideos { target } => {
                info!("Searching for last {} videos...", target)
            }
            ScrapeEvent::VideosTabNotFound => warn!("Cannot find videos tab"),
            ScrapeEvent::ListingTimedOut => {
                warn!("Video listing did not render in time")
            }
            ScrapeEvent::Scrolled { iteration, items } => {
                debug!("Scroll {}: {} items rendered", iteration, items)
            }
            ScrapeEvent::ScrollSettleTimedOut { iteration } => {
                debug!("Scroll {}: listing still loading after settle window", iteration)
            }
            ScrapeEvent::CollectionFinished { collected, stop } => {
                info!("Collected {} items ({:?})", collected, stop)
            }
            ScrapeEvent::VideosMapped { count } => {
                info!("Videos list obtained ({} records)", count)
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<ScrapeEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, event: &ScrapeEvent) -> bool {
        self.events().iter().any(|e| e == event)
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, event: ScrapeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
