//! CSS selectors for the channel page.
//!
//! Defaults target the grid-layout channel page. Every selector can be
//! overridden in the `[scrape.selectors]` config section when the site markup
//! shifts, without a rebuild.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Channel title in the page header. Its absence means "channel not found".
    pub channel_name: String,
    /// Verification badge inside the channel title.
    pub verified_badge: String,
    pub subscribers: String,
    /// Label elements of the top-level navigation tabs.
    pub tab_labels: String,

    pub about_description: String,
    pub about_created_at: String,
    pub about_views: String,

    /// Rendered entries of the video listing.
    pub video_items: String,
    /// Spinner shown while the listing loads more entries.
    pub loading_indicator: String,

    // Item fields, relative to one listing entry.
    pub item_title: String,
    pub item_thumbnail: String,
    pub item_link: String,
    pub item_views: String,
    pub item_upload_date: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            channel_name: "#channel-name".to_string(),
            verified_badge: "#channel-name yt-icon".to_string(),
            subscribers: "#subscriber-count".to_string(),
            tab_labels: "paper-tab div".to_string(),
            about_description: "#left-column #description".to_string(),
            about_created_at: "#right-column span:nth-child(2)".to_string(),
            about_views: "#right-column yt-formatted-string:nth-child(3)".to_string(),
            video_items: "#contents #items > ytd-grid-video-renderer".to_string(),
            loading_indicator: "#spinnerContainer.style-scope.paper-spinner".to_string(),
            item_title: "#video-title".to_string(),
            item_thumbnail: "#img".to_string(),
            item_link: "#thumbnail".to_string(),
            item_views: "#metadata-line span:nth-child(1)".to_string(),
            item_upload_date: "#metadata-line span:nth-child(2)".to_string(),
        }
    }
}
