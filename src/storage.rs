//! Report persistence.
//!
//! Reports are written as compact JSON to `<dir>/<channel>-<unix millis>.json`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::models::ChannelReport;

/// File stem used when the channel name could not be read.
pub const UNKNOWN_CHANNEL: &str = "unknown-channel";

/// Make a channel name safe to use as a file name.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('_');
    if trimmed.is_empty() {
        UNKNOWN_CHANNEL.to_string()
    } else {
        // Char-based so multi-byte names never split mid-codepoint.
        trimmed.chars().take(100).collect()
    }
}

pub fn report_file_name(channel_name: Option<&str>, timestamp_millis: i64) -> String {
    let stem = channel_name
        .map(sanitize_filename)
        .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());
    format!("{}-{}.json", stem, timestamp_millis)
}

/// Write `report` into `dir`, creating the directory if needed.
pub async fn save_report(dir: &Path, report: &ChannelReport) -> Result<PathBuf> {
    save_report_at(dir, report, chrono::Utc::now().timestamp_millis()).await
}

pub async fn save_report_at(
    dir: &Path,
    report: &ChannelReport,
    timestamp_millis: i64,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(report_file_name(report.channel_name(), timestamp_millis));
    let json = serde_json::to_vec(report)?;
    tokio::fs::write(&path, json).await?;

    info!("Saved {} videos to {}", report.videos.len(), path.display());
    Ok(path)
}
