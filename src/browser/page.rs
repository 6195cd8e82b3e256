//! chromiumoxide implementation of the DOM traits.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Element, Page};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::dom::{ElementHandle, PageDriver};
use crate::error::{Result, ScrapeError};

/// JavaScript to wait for page ready state.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

const SCROLL_TO_BOTTOM_SCRIPT: &str =
    "window.scrollTo(0, document.body.scrollHeight || document.documentElement.scrollHeight);";

/// Resolves once no new resource entries have appeared for `idle` ms, or
/// after `cap` ms regardless.
fn network_idle_script(idle: Duration, cap: Duration) -> String {
    format!(
        r#"
        new Promise((resolve) => {{
            const idle = {idle};
            const deadline = Date.now() + {cap};
            let last = -1;
            let stableSince = Date.now();
            const tick = () => {{
                const n = performance.getEntriesByType('resource').length;
                if (n !== last) {{
                    last = n;
                    stableSince = Date.now();
                }}
                if (Date.now() - stableSince >= idle || Date.now() >= deadline) {{
                    resolve(n);
                    return;
                }}
                setTimeout(tick, 50);
            }};
            tick();
        }})
        "#,
        idle = idle.as_millis(),
        cap = cap.as_millis(),
    )
}

/// Visible means present, not `display: none`, not `visibility: hidden`, and
/// with a non-empty box.
fn visibility_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({selector});
            if (!el) return false;
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return style.display !== 'none'
                && style.visibility !== 'hidden'
                && (rect.width > 0 || rect.height > 0);
        }})()
        "#
    ))
}

/// A live browser tab.
#[derive(Debug, Clone)]
pub struct CdpPage {
    page: Page,
    request_timeout: Duration,
    network_idle: Duration,
}

impl CdpPage {
    pub(crate) fn new(page: Page, request_timeout: Duration) -> Self {
        Self {
            page,
            request_timeout,
            network_idle: Duration::from_millis(500),
        }
    }

    pub(crate) fn set_network_idle(&mut self, idle: Duration) {
        self.network_idle = idle;
    }

    pub(crate) fn inner(&self) -> &Page {
        &self.page
    }

    async fn wait_for_ready_state(&self) {
        match timeout(
            self.request_timeout,
            self.page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()),
        )
        .await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page ready state"),
        }
    }

    async fn wait_for_network_idle(&self) {
        if self.network_idle.is_zero() {
            return;
        }
        let script = network_idle_script(self.network_idle, self.request_timeout);
        match timeout(self.request_timeout, self.page.evaluate(script)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!("Network idle check failed: {}", e),
            Err(_) => warn!("Timeout waiting for network idle"),
        }
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    type Element = CdpElement;

    async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        let navigation_error = |reason: String| ScrapeError::Navigation {
            url: url.to_string(),
            reason,
        };

        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| navigation_error(format!("Invalid URL: {}", e)))?;

        let response = timeout(self.request_timeout, self.page.execute(params))
            .await
            .map_err(|_| {
                navigation_error(format!(
                    "timed out after {}s",
                    self.request_timeout.as_secs()
                ))
            })?
            .map_err(|e| navigation_error(e.to_string()))?;

        if let Some(error) = response.result.error_text.clone() {
            return Err(navigation_error(error));
        }

        self.wait_for_ready_state().await;
        self.wait_for_network_idle().await;
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<CdpElement>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<CdpElement>> {
        let elements = self.page.find_elements(selector).await?;
        Ok(elements.into_iter().map(CdpElement).collect())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page.evaluate(SCROLL_TO_BOTTOM_SCRIPT.to_string()).await?;
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let result = self.page.evaluate(visibility_script(selector)?).await?;
        Ok(result.into_value::<bool>().unwrap_or(false))
    }
}

/// A remote DOM node.
#[derive(Debug)]
pub struct CdpElement(Element);

#[async_trait]
impl ElementHandle for CdpElement {
    async fn inner_text(&self) -> Result<Option<String>> {
        Ok(self.0.inner_text().await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attribute(name).await?)
    }

    async fn find(&self, selector: &str) -> Result<Option<Self>> {
        let elements = self.0.find_elements(selector).await?;
        Ok(elements.into_iter().next().map(CdpElement))
    }

    async fn click(&self) -> Result<()> {
        self.0.click().await?;
        Ok(())
    }
}
