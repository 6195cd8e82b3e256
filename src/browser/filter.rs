//! Request interception that aborts heavy resource classes.
//!
//! Scraping only needs the DOM and the scripts that build it, so images,
//! stylesheets and fonts are failed with `BlockedByClient` before they hit
//! the network. Everything else continues unmodified.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// A request's media type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    WebSocket,
    Manifest,
    Other,
}

impl ResourceClass {
    /// Classes aborted by default.
    pub fn default_blocked() -> Vec<Self> {
        vec![Self::Image, Self::Stylesheet, Self::Font]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Stylesheet => "stylesheet",
            Self::Image => "image",
            Self::Media => "media",
            Self::Font => "font",
            Self::Script => "script",
            Self::Xhr => "xhr",
            Self::Fetch => "fetch",
            Self::WebSocket => "websocket",
            Self::Manifest => "manifest",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of resource classes to abort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    classes: HashSet<ResourceClass>,
}

impl BlockList {
    pub fn new(classes: &[ResourceClass]) -> Self {
        Self {
            classes: classes.iter().copied().collect(),
        }
    }

    pub fn should_block(&self, class: ResourceClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Tracks whether a page already has a filter answering its paused requests.
///
/// A second responder would race the first for every request id.
#[derive(Debug, Default)]
pub struct FilterSlot {
    attached: bool,
}

impl FilterSlot {
    /// Run `attach` if no filter is attached yet.
    ///
    /// The slot is only marked attached once `attach` succeeds, so a failed
    /// attempt can be retried.
    pub async fn attach_with<T, F, Fut>(&mut self, attach: F) -> Result<T, ScrapeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ScrapeError>>,
    {
        if self.attached {
            return Err(ScrapeError::FilterAlreadyAttached);
        }
        let attached = attach().await?;
        self.attached = true;
        Ok(attached)
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(feature = "browser")]
mod cdp {
    use chromiumoxide::cdp::browser_protocol::fetch::{
        ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams,
    };
    use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
    use chromiumoxide::Page;
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, trace};

    use super::{BlockList, ResourceClass};
    use crate::error::Result;

    impl From<&ResourceType> for ResourceClass {
        fn from(kind: &ResourceType) -> Self {
            match kind {
                ResourceType::Document => Self::Document,
                ResourceType::Stylesheet => Self::Stylesheet,
                ResourceType::Image => Self::Image,
                ResourceType::Media => Self::Media,
                ResourceType::Font => Self::Font,
                ResourceType::Script => Self::Script,
                ResourceType::Xhr => Self::Xhr,
                ResourceType::Fetch => Self::Fetch,
                ResourceType::WebSocket => Self::WebSocket,
                ResourceType::Manifest => Self::Manifest,
                _ => Self::Other,
            }
        }
    }

    /// Start answering paused requests on `page`.
    ///
    /// Enables the Fetch domain on the page; every request then waits for
    /// this task's reply. The task runs until the page's event stream ends.
    pub(crate) async fn attach(page: &Page, block: BlockList) -> Result<JoinHandle<()>> {
        let mut paused = page.event_listener::<EventRequestPaused>().await?;
        page.execute(EnableParams::default()).await?;
        let page = page.clone();

        Ok(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let class = ResourceClass::from(&event.resource_type);
                let outcome = if block.should_block(class) {
                    trace!("Blocking {} {}", class, event.request.url);
                    page.execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
                } else {
                    page.execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = outcome {
                    // The page may have navigated away before we answered.
                    debug!("Interception reply failed for {}: {}", event.request.url, e);
                }
            }
        }))
    }
}

#[cfg(feature = "browser")]
pub(crate) use cdp::attach;
