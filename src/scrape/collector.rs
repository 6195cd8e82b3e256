//! Incremental collection of listing entries through infinite scroll.
//!
//! The collector opens the videos tab, samples the rendered entries, and
//! keeps scrolling until one of:
//! - the sample reaches the target count,
//! - a scroll produces no new entries (exhaustion),
//! - the iteration cap is hit.
//!
//! The result is truncated to the target count.

use tokio::time::{timeout, Instant};

use crate::config::ScrapeConfig;
use crate::dom::{ElementHandle, PageDriver};
use crate::error::{Phase, Result, ScrapeError};
use crate::events::{EventSink, ScrapeEvent};

use super::tabs::find_tab;
use super::wait::{poll_until, WaitOutcome};

/// Why collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStop {
    /// Enough entries were rendered.
    Satisfied,
    /// A scroll rendered nothing new.
    Exhausted,
    /// `max_scroll_iterations` was reached while the listing was still growing.
    IterationCap,
    /// The page has no videos tab.
    TabNotFound,
}

/// Collected entry handles plus the reason collection ended.
#[derive(Debug)]
pub struct Collection<E> {
    pub items: Vec<E>,
    pub stop: CollectionStop,
    pub iterations: u32,
}

impl<E> Collection<E> {
    fn empty(stop: CollectionStop) -> Self {
        Self {
            items: Vec::new(),
            stop,
            iterations: 0,
        }
    }
}

/// Per-run counters, updated once per scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionState {
    pub target_count: usize,
    pub last_observed_count: usize,
    pub current_item_count: usize,
    pub iterations: u32,
}

/// Whether the latest sample grew the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Grew,
    Stalled,
}

impl CollectionState {
    pub fn new(target_count: usize, initial_count: usize) -> Self {
        Self {
            target_count,
            last_observed_count: initial_count,
            current_item_count: initial_count,
            iterations: 0,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.current_item_count >= self.target_count
    }

    /// Record the sample taken after one scroll.
    pub fn observe(&mut self, count: usize) -> Progress {
        self.iterations += 1;
        self.last_observed_count = self.current_item_count;
        self.current_item_count = count;
        if count > self.last_observed_count {
            Progress::Grew
        } else {
            Progress::Stalled
        }
    }
}

/// Open the videos tab and gather at most `target_count` entry handles.
pub async fn collect<P: PageDriver>(
    page: &P,
    target_count: usize,
    config: &ScrapeConfig,
    events: &dyn EventSink,
) -> Result<Collection<P::Element>> {
    events.emit(ScrapeEvent::SearchingVideos {
        target: target_count,
    });

    if target_count == 0 {
        return Ok(Collection::empty(CollectionStop::Satisfied));
    }

    let selectors = &config.selectors;

    let Some((index, tab)) = find_tab(page, &selectors.tab_labels, &config.videos_tab).await?
    else {
        events.emit(ScrapeEvent::VideosTabNotFound);
        return Ok(Collection::empty(CollectionStop::TabNotFound));
    };
    tracing::debug!("Videos tab found at position {}", index);

    let tab_limit = config.tab_deadline();
    timeout(tab_limit, open_listing(page, &tab, config, events))
        .await
        .map_err(|_| ScrapeError::DeadlineExceeded {
            phase: Phase::TabActivation,
            limit: tab_limit,
        })??;

    let mut items = page.find_all(&selectors.video_items).await?;
    let mut state = CollectionState::new(target_count, items.len());
    let mut stop = CollectionStop::Satisfied;

    while !state.is_satisfied() {
        if state.iterations >= config.max_scroll_iterations {
            stop = CollectionStop::IterationCap;
            break;
        }

        let scroll_limit = config.scroll_deadline();
        let (sampled, settled) =
            timeout(scroll_limit, scroll_and_sample(page, state.current_item_count, config))
                .await
                .map_err(|_| ScrapeError::DeadlineExceeded {
                    phase: Phase::ScrollIteration,
                    limit: scroll_limit,
                })??;
        items = sampled;

        let progress = state.observe(items.len());
        if !settled.is_ready() {
            events.emit(ScrapeEvent::ScrollSettleTimedOut {
                iteration: state.iterations,
            });
        }
        events.emit(ScrapeEvent::Scrolled {
            iteration: state.iterations,
            items: items.len(),
        });

        if progress == Progress::Stalled {
            stop = CollectionStop::Exhausted;
            break;
        }
    }

    items.truncate(target_count);
    events.emit(ScrapeEvent::CollectionFinished {
        collected: items.len(),
        stop,
    });

    Ok(Collection {
        items,
        stop,
        iterations: state.iterations,
    })
}

/// Click the tab and wait, bounded, for the first entries to render.
async fn open_listing<P: PageDriver>(
    page: &P,
    tab: &P::Element,
    config: &ScrapeConfig,
    events: &dyn EventSink,
) -> Result<()> {
    tab.click().await?;

    let items_selector = config.selectors.video_items.as_str();
    let outcome = poll_until(config.tab_settle(), config.poll_interval(), move || async move {
        Ok(page.count(items_selector).await? > 0)
    })
    .await?;
    if !outcome.is_ready() {
        events.emit(ScrapeEvent::ListingTimedOut);
    }
    Ok(())
}

/// Scroll once, wait for the listing to settle, and re-sample it.
///
/// The wait ends early when the entry count rises above `previous`, or when
/// the loading indicator is gone once the minimum settle time has passed.
async fn scroll_and_sample<P: PageDriver>(
    page: &P,
    previous: usize,
    config: &ScrapeConfig,
) -> Result<(Vec<P::Element>, WaitOutcome)> {
    page.scroll_to_bottom().await?;

    let selectors = &config.selectors;
    let items_selector = selectors.video_items.as_str();
    let spinner_selector = selectors.loading_indicator.as_str();
    let min_settle = config.min_scroll_settle();
    let started = Instant::now();

    let settled = poll_until(config.scroll_settle(), config.poll_interval(), move || async move {
        if page.count(items_selector).await? > previous {
            return Ok(true);
        }
        if started.elapsed() < min_settle {
            return Ok(false);
        }
        Ok(!page.is_visible(spinner_selector).await?)
    })
    .await?;

    Ok((page.find_all(items_selector).await?, settled))
}
