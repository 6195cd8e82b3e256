//! In-memory page used to exercise the scrape flow without a browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{ElementHandle, PageDriver};
use crate::error::{Result, ScrapeError};
use crate::scrape::Selectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickAction {
    OpenAbout,
    OpenVideos,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeNode {
    pub text: Option<String>,
    pub attrs: HashMap<String, String>,
    pub children: HashMap<String, FakeNode>,
    pub on_click: Option<ClickAction>,
}

impl FakeNode {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children.insert(selector.to_string(), node);
        self
    }

    pub fn on_click(mut self, action: ClickAction) -> Self {
        self.on_click = Some(action);
        self
    }

    /// A fully populated listing entry numbered `n`.
    pub fn video(n: usize) -> Self {
        let s = Selectors::default();
        Self::empty()
            .child(&s.item_title, Self::text(&format!("  Video {n}  ")))
            .child(
                &s.item_thumbnail,
                Self::empty().attr("src", &format!("https://i.ytimg.com/vi/v{n}/hq.jpg")),
            )
            .child(
                &s.item_link,
                Self::empty().attr("href", &format!("/watch?v=v{n}")),
            )
            .child(&s.item_views, Self::text(&format!("{n}K views")))
            .child(&s.item_upload_date, Self::text(&format!("{n} days ago")))
    }

    pub fn videos(count: usize) -> Vec<Self> {
        (1..=count).map(Self::video).collect()
    }
}

#[derive(Debug, Default)]
struct FakeState {
    nodes: HashMap<String, Vec<FakeNode>>,
    about_nodes: HashMap<String, Vec<FakeNode>>,
    listing_selector: String,
    listing: Vec<FakeNode>,
    /// Items rendered after N scrolls, indexed by N; the last entry repeats.
    schedule: Vec<usize>,
    about_open: bool,
    videos_open: bool,
    scrolls: u32,
    scroll_delay: Option<Duration>,
    goto_delay: Option<Duration>,
    click_delay: Option<Duration>,
    navigation_error: Option<String>,
    navigations: Vec<String>,
    queries: Vec<String>,
    clicks: Vec<ClickAction>,
}

impl FakeState {
    fn rendered(&self) -> usize {
        if !self.videos_open {
            return 0;
        }
        let scheduled = match self.schedule.last() {
            None => self.listing.len(),
            Some(last) => *self
                .schedule
                .get(self.scrolls as usize)
                .unwrap_or(last),
        };
        scheduled.min(self.listing.len())
    }

    fn matching(&self, selector: &str) -> Vec<FakeNode> {
        if selector == self.listing_selector {
            return self.listing[..self.rendered()].to_vec();
        }
        let mut found = self.nodes.get(selector).cloned().unwrap_or_default();
        if self.about_open {
            if let Some(about) = self.about_nodes.get(selector) {
                found.extend(about.iter().cloned());
            }
        }
        found
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeElement {
    node: FakeNode,
    state: Arc<Mutex<FakeState>>,
}

fn lock(state: &Mutex<FakeState>) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakePage {
    pub fn builder() -> FakePageBuilder {
        FakePageBuilder::default()
    }

    fn wrap(&self, node: FakeNode) -> FakeElement {
        FakeElement {
            node,
            state: Arc::clone(&self.state),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        lock(&self.state).queries.clone()
    }

    pub fn scrolls(&self) -> u32 {
        lock(&self.state).scrolls
    }

    pub fn navigations(&self) -> Vec<String> {
        lock(&self.state).navigations.clone()
    }

    pub fn clicks(&self) -> Vec<ClickAction> {
        lock(&self.state).clicks.clone()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<()> {
        let delay = lock(&self.state).goto_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = lock(&self.state);
        if let Some(reason) = state.navigation_error.clone() {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason,
            });
        }
        state.navigations.push(url.to_string());
        state.about_open = false;
        state.videos_open = false;
        state.scrolls = 0;
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<FakeElement>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let nodes = {
            let mut state = lock(&self.state);
            state.queries.push(selector.to_string());
            state.matching(selector)
        };
        Ok(nodes.into_iter().map(|n| self.wrap(n)).collect())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let delay = lock(&self.state).scroll_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.state).scrolls += 1;
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(!lock(&self.state).matching(selector).is_empty())
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn inner_text(&self) -> Result<Option<String>> {
        Ok(self.node.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.node.attrs.get(name).cloned())
    }

    async fn find(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.node.children.get(selector).map(|child| FakeElement {
            node: child.clone(),
            state: Arc::clone(&self.state),
        }))
    }

    async fn click(&self) -> Result<()> {
        let delay = lock(&self.state).click_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = lock(&self.state);
        if let Some(action) = self.node.on_click {
            state.clicks.push(action);
            match action {
                ClickAction::OpenAbout => state.about_open = true,
                ClickAction::OpenVideos => state.videos_open = true,
            }
        }
        Ok(())
    }
}

pub(crate) struct FakePageBuilder {
    selectors: Selectors,
    state: FakeState,
}

impl Default for FakePageBuilder {
    fn default() -> Self {
        let selectors = Selectors::default();
        let state = FakeState {
            listing_selector: selectors.video_items.clone(),
            ..Default::default()
        };
        Self { selectors, state }
    }
}

impl FakePageBuilder {
    pub fn node(mut self, selector: &str, node: FakeNode) -> Self {
        self.state
            .nodes
            .entry(selector.to_string())
            .or_default()
            .push(node);
        self
    }

    pub fn channel_name(self, name: &str) -> Self {
        let selector = self.selectors.channel_name.clone();
        self.node(&selector, FakeNode::text(name))
    }

    pub fn verified(self) -> Self {
        let selector = self.selectors.verified_badge.clone();
        self.node(&selector, FakeNode::empty())
    }

    pub fn subscribers(self, text: &str) -> Self {
        let selector = self.selectors.subscribers.clone();
        self.node(&selector, FakeNode::text(text))
    }

    pub fn tab(self, node: FakeNode) -> Self {
        let selector = self.selectors.tab_labels.clone();
        self.node(&selector, node)
    }

    pub fn about_tab(self) -> Self {
        self.tab(FakeNode::text("About").on_click(ClickAction::OpenAbout))
    }

    pub fn videos_tab(self) -> Self {
        self.tab(FakeNode::text("Videos").on_click(ClickAction::OpenVideos))
    }

    /// Node that only exists once the about tab has been clicked.
    pub fn about_field(mut self, selector: &str, text: &str) -> Self {
        self.state
            .about_nodes
            .entry(selector.to_string())
            .or_default()
            .push(FakeNode::text(text));
        self
    }

    pub fn listing(mut self, items: Vec<FakeNode>) -> Self {
        self.state.listing = items;
        self
    }

    /// Rendered item counts: index 0 before any scroll, index N after N scrolls.
    pub fn schedule(mut self, counts: &[usize]) -> Self {
        self.state.schedule = counts.to_vec();
        self
    }

    pub fn scroll_delay(mut self, delay: Duration) -> Self {
        self.state.scroll_delay = Some(delay);
        self
    }

    pub fn goto_delay(mut self, delay: Duration) -> Self {
        self.state.goto_delay = Some(delay);
        self
    }

    pub fn click_delay(mut self, delay: Duration) -> Self {
        self.state.click_delay = Some(delay);
        self
    }

    /// Loading spinner that never goes away.
    pub fn loading_indicator(self) -> Self {
        let selector = self.selectors.loading_indicator.clone();
        self.node(&selector, FakeNode::empty())
    }

    pub fn navigation_error(mut self, reason: &str) -> Self {
        self.state.navigation_error = Some(reason.to_string());
        self
    }

    pub fn build(self) -> FakePage {
        FakePage {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}
