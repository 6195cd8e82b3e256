//! tubescrape - headless-browser scraper for video channels.
//!
//! Drives a Chrome page to read a channel's header and about panel, then
//! scrolls its video listing until enough entries have rendered and maps them
//! into [`VideoRecord`]s.

pub mod browser;
pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod models;
pub mod scrape;
pub mod storage;

pub use config::Config;
pub use error::{Phase, Result, ScrapeError};
pub use events::{EventSink, ScrapeEvent, TracingSink};
pub use models::{ChannelInfo, ChannelReport, VideoRecord};
pub use scrape::ChannelScraper;
