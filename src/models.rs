//! Records produced by a channel scrape.

use serde::{Deserialize, Serialize};

/// Channel metadata snapshot.
///
/// Only produced when a channel name was found; a missing channel is
/// represented by `None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel_name: String,
    pub verified: bool,
    pub subscribers: Option<String>,
    /// About-panel description, `None` if the panel or element was missing.
    pub description: Option<String>,
    /// Display string such as "Joined Mar 4, 2011", not a parsed date.
    pub created_at: Option<String>,
    pub views: Option<String>,
}

/// One entry from the channel's video listing.
///
/// Every field is the rendered display text or attribute value; absent
/// sub-elements leave the field `None` without invalidating the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub url: Option<String>,
    pub views: Option<String>,
    pub upload_date: Option<String>,
}

impl VideoRecord {
    /// Number of fields that were captured.
    pub fn populated_fields(&self) -> usize {
        [
            &self.title,
            &self.thumbnail,
            &self.url,
            &self.views,
            &self.upload_date,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }

    /// True if every field is present.
    pub fn is_complete(&self) -> bool {
        self.populated_fields() == 5
    }
}

/// Result handed to persistence: `{ "main": ..., "videos": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub main: Option<ChannelInfo>,
    pub videos: Vec<VideoRecord>,
}

impl ChannelReport {
    /// Channel name if metadata extraction found one.
    pub fn channel_name(&self) -> Option<&str> {
        self.main.as_ref().map(|m| m.channel_name.as_str())
    }
}
