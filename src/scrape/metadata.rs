//! Channel header and about-panel extraction.

use tokio::time::timeout;

use crate::config::ScrapeConfig;
use crate::dom::{page_text, text_of, ElementHandle, PageDriver};
use crate::error::{Phase, Result, ScrapeError};
use crate::events::{EventSink, ScrapeEvent};
use crate::models::ChannelInfo;

use super::tabs::find_tab;
use super::wait::poll_until;

/// Navigate to `channel_url` and read its metadata.
///
/// Returns `Ok(None)` when the channel name is missing or blank; the rest of
/// the page is not read in that case.
pub async fn extract<P: PageDriver>(
    page: &P,
    channel_url: &str,
    config: &ScrapeConfig,
    events: &dyn EventSink,
) -> Result<Option<ChannelInfo>> {
    events.emit(ScrapeEvent::SearchingMetadata);

    let limit = config.metadata_deadline();
    let info = timeout(limit, async {
        events.emit(ScrapeEvent::Navigating {
            url: channel_url.to_string(),
        });
        page.goto(channel_url).await?;
        read_channel_info(page, config, events).await
    })
    .await
    .map_err(|_| ScrapeError::DeadlineExceeded {
        phase: Phase::Metadata,
        limit,
    })??;

    match &info {
        Some(info) => events.emit(ScrapeEvent::MetadataExtracted {
            channel_name: info.channel_name.clone(),
        }),
        None => events.emit(ScrapeEvent::ChannelNotFound),
    }
    Ok(info)
}

/// Read metadata from an already loaded channel page.
pub async fn read_channel_info<P: PageDriver>(
    page: &P,
    config: &ScrapeConfig,
    events: &dyn EventSink,
) -> Result<Option<ChannelInfo>> {
    let selectors = &config.selectors;

    let channel_name = match page.find(&selectors.channel_name).await? {
        Some(element) => text_of(&element).await?,
        None => None,
    };
    let Some(channel_name) = channel_name else {
        return Ok(None);
    };

    let verified = page.find(&selectors.verified_badge).await?.is_some();
    let subscribers = page_text(page, &selectors.subscribers).await?;

    let mut info = ChannelInfo {
        channel_name,
        verified,
        subscribers,
        description: None,
        created_at: None,
        views: None,
    };

    let Some((_, about_tab)) = find_tab(page, &selectors.tab_labels, &config.about_tab).await?
    else {
        events.emit(ScrapeEvent::AboutTabMissing);
        return Ok(Some(info));
    };

    about_tab.click().await?;

    let description_selector = selectors.about_description.as_str();
    let rendered = poll_until(config.about_settle(), config.poll_interval(), move || async move {
        Ok(page.find(description_selector).await?.is_some())
    })
    .await?;
    if !rendered.is_ready() {
        events.emit(ScrapeEvent::AboutPanelTimedOut);
    }

    info.description = page_text(page, &selectors.about_description).await?;
    info.created_at = page_text(page, &selectors.about_created_at).await?;
    info.views = page_text(page, &selectors.about_views).await?;

    Ok(Some(info))
}
