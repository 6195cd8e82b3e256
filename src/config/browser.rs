//! Browser engine configuration types.
//!
//! These types live outside `#[cfg(feature = "browser")]` so config parsing
//! and serialization work without the browser feature.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::browser::filter::ResourceClass;

/// Default user agent presented to the site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Abort requests for the resource classes in `blocked_resources`.
    #[serde(default = "default_block_resources")]
    pub block_resources: bool,

    /// Resource classes aborted when `block_resources` is on.
    #[serde(default = "ResourceClass::default_blocked")]
    pub blocked_resources: Vec<ResourceClass>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Explicit Chrome/Chromium executable. Discovered when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Navigation and CDP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// User agent override. Empty string keeps the browser's own.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

pub fn default_headless() -> bool {
    true
}

pub fn default_block_resources() -> bool {
    true
}

pub fn default_viewport_width() -> u32 {
    1366
}

pub fn default_viewport_height() -> u32 {
    768
}

pub fn default_timeout() -> u64 {
    30
}

pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            block_resources: default_block_resources(),
            blocked_resources: ResourceClass::default_blocked(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            chrome_path: None,
            chrome_args: Vec::new(),
            remote_url: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply environment variable overrides.
    ///
    /// - `BROWSER_URL` - Remote Chrome DevTools URL
    /// - `CHROME_PATH` - Chrome/Chromium executable
    /// - `TUBESCRAPE_HEADLESS` - "true"/"false"
    /// - `TUBESCRAPE_BLOCK_RESOURCES` - "true"/"false"
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("BROWSER_URL") {
            if !val.is_empty() {
                self.remote_url = Some(val);
            }
        }
        if let Ok(val) = std::env::var("CHROME_PATH") {
            if !val.is_empty() {
                self.chrome_path = Some(PathBuf::from(val));
            }
        }
        if let Some(headless) = env_flag("TUBESCRAPE_HEADLESS") {
            self.headless = headless;
        }
        if let Some(block) = env_flag("TUBESCRAPE_BLOCK_RESOURCES") {
            self.block_resources = block;
        }
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

/// Parse a boolean-ish string ("1", "true", "yes", "on" and their negatives).
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_desktop_viewport_and_blocking() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert!(config.block_resources);
        assert_eq!((config.viewport_width, config.viewport_height), (1366, 768));
        assert_eq!(
            config.blocked_resources,
            vec![
                ResourceClass::Image,
                ResourceClass::Stylesheet,
                ResourceClass::Font
            ]
        );
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: BrowserEngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, BrowserEngineConfig::default());
    }

    #[test]
    fn blocked_resources_parse_lowercase() {
        let config: BrowserEngineConfig =
            toml::from_str(r#"blocked_resources = ["image", "media"]"#).unwrap();
        assert_eq!(
            config.blocked_resources,
            vec![ResourceClass::Image, ResourceClass::Media]
        );
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
