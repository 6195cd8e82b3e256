//! Channel scraping: metadata extraction, listing collection, record mapping.

pub mod collector;
pub mod mapper;
pub mod metadata;
mod selectors;
pub mod tabs;
pub mod wait;

pub use collector::{collect, Collection, CollectionState, CollectionStop};
pub use mapper::{map_item, map_items};
pub use metadata::extract;
pub use selectors::Selectors;
pub use tabs::LabelMatcher;
pub use wait::{poll_until, WaitOutcome};

use tokio::time::timeout;
#[cfg(feature = "browser")]
use tracing::info;

use crate::config::{Config, ScrapeConfig};
use crate::dom::PageDriver;
use crate::error::{Phase, Result, ScrapeError};
use crate::events::{EventSink, ScrapeEvent};
use crate::models::ChannelReport;

/// Runs the scrape phases in order against one page.
pub struct ChannelScraper<'a> {
    config: &'a ScrapeConfig,
    events: &'a dyn EventSink,
}

impl<'a> ChannelScraper<'a> {
    pub fn new(config: &'a ScrapeConfig, events: &'a dyn EventSink) -> Self {
        Self { config, events }
    }

    /// Extract metadata, return to the channel root, then collect and map
    /// up to `count` videos.
    pub async fn scrape<P: PageDriver>(
        &self,
        page: &P,
        channel_url: &str,
        count: usize,
    ) -> Result<ChannelReport> {
        let main = extract(page, channel_url, self.config, self.events).await?;

        self.events.emit(ScrapeEvent::Navigating {
            url: channel_url.to_string(),
        });
        let limit = self.config.navigation_deadline();
        timeout(limit, page.goto(channel_url))
            .await
            .map_err(|_| ScrapeError::DeadlineExceeded {
                phase: Phase::Navigation,
                limit,
            })??;

        let collection = collect(page, count, self.config, self.events).await?;
        let videos = map_items(&collection.items, &self.config.selectors).await?;
        self.events.emit(ScrapeEvent::VideosMapped {
            count: videos.len(),
        });

        Ok(ChannelReport { main, videos })
    }
}

/// Launch a browser session, scrape one channel, and close the session.
///
/// The session is closed even when scraping fails; the scrape error wins over
/// a close error.
#[cfg(feature = "browser")]
pub async fn run(
    config: &Config,
    channel_url: &str,
    count: usize,
    events: &dyn EventSink,
) -> Result<ChannelReport> {
    config.scrape.validate().map_err(ScrapeError::Config)?;

    let session = crate::browser::Session::init(&config.browser)
        .await?
        .with_network_idle(config.scrape.network_idle());
    info!(
        "Session ready (headless={}, resource filter={})",
        session.headless(),
        session.resource_filter_enabled()
    );

    let result = ChannelScraper::new(&config.scrape, events)
        .scrape(session.page(), channel_url, count)
        .await;
    let closed = session.close().await;

    let report = result?;
    closed?;
    Ok(report)
}

#[cfg(not(feature = "browser"))]
pub async fn run(
    config: &Config,
    _channel_url: &str,
    _count: usize,
    _events: &dyn EventSink,
) -> Result<ChannelReport> {
    config.scrape.validate().map_err(ScrapeError::Config)?;
    match crate::browser::Session::init(&config.browser).await? {}
}
