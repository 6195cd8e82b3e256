//! Browser session management.
//!
//! A [`Session`] owns one Chrome instance (launched locally or reached over a
//! remote DevTools endpoint), the CDP handler task, and the single page the
//! scraper drives. Without the `browser` feature, [`Session::init`] fails with
//! a message explaining how to rebuild.

pub mod filter;
#[cfg(feature = "browser")]
mod page;

use std::future::Future;
use std::path::{Path, PathBuf};

#[cfg(feature = "browser")]
pub use page::{CdpElement, CdpPage};

#[cfg(not(feature = "browser"))]
use crate::config::BrowserEngineConfig;
use crate::error::{Result, ScrapeError};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Locate a Chrome/Chromium executable.
///
/// An explicit path must exist; otherwise well-known install locations are
/// tried before `PATH`.
pub fn find_chrome(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(ScrapeError::Launch(format!(
                "Configured Chrome executable does not exist: {}",
                path.display()
            )))
        };
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            tracing::info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            tracing::info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(ScrapeError::Launch(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set CHROME_PATH / browser.chrome_path"
            .to_string(),
    ))
}

/// Turn a DevTools endpoint into its `/json/version` URL.
pub fn version_endpoint(remote_url: &str) -> String {
    let http_url = remote_url
        .replace("ws://", "http://")
        .replace("wss://", "https://");
    format!("{}/json/version", http_url.trim_end_matches('/'))
}

/// Pass `result` through, handing `resource` back on success. On failure
/// `resource` goes to `teardown` before the error is returned.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub(crate) async fn unwind_on_error<T, R, F, Fut>(
    result: Result<T>,
    resource: R,
    teardown: F,
) -> Result<(T, R)>
where
    F: FnOnce(R) -> Fut,
    Fut: Future<Output = ()>,
{
    match result {
        Ok(value) => Ok((value, resource)),
        Err(e) => {
            teardown(resource).await;
            Err(e)
        }
    }
}

#[cfg(feature = "browser")]
mod session {
    use std::time::Duration;

    use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
    use chromiumoxide::cdp::browser_protocol::security::SetIgnoreCertificateErrorsParams;
    use chromiumoxide::error::CdpError;
    use chromiumoxide::handler::viewport::Viewport;
    use chromiumoxide::handler::HandlerConfig;
    use chromiumoxide::{Browser, BrowserConfig as ChromeConfig, Handler};
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, info, warn};

    use super::filter::{self, BlockList, FilterSlot, ResourceClass};
    use super::{find_chrome, unwind_on_error, version_endpoint, CdpPage};
    use crate::config::BrowserEngineConfig;
    use crate::error::{Result, ScrapeError};

    impl From<CdpError> for ScrapeError {
        fn from(e: CdpError) -> Self {
            ScrapeError::Browser(e.to_string())
        }
    }

    /// One browser and the page the scraper drives.
    pub struct Session {
        browser: Browser,
        handler: JoinHandle<()>,
        page: CdpPage,
        filter: FilterSlot,
        filter_task: Option<JoinHandle<()>>,
        headless: bool,
        remote: bool,
        request_timeout: Duration,
    }

    fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        })
    }

    async fn launch(config: &BrowserEngineConfig) -> Result<(Browser, Handler)> {
        info!("Launching browser (headless={})", config.headless);
        let chrome_path = find_chrome(config.chrome_path.as_deref())?;

        let mut builder = ChromeConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(config.viewport_width, config.viewport_height)
            .viewport(Some(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            }))
            .request_timeout(Duration::from_secs(config.timeout));

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--ignore-certificate-errors")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let chrome_config = builder
            .build()
            .map_err(|e| ScrapeError::Launch(format!("Invalid browser config: {}", e)))?;

        Browser::launch(chrome_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))
    }

    async fn connect_remote(config: &BrowserEngineConfig, url: &str) -> Result<(Browser, Handler)> {
        info!(
            "Connecting to remote browser at {} (timeout: {}s)",
            url, config.timeout
        );

        let resp: serde_json::Value = reqwest::Client::new()
            .get(version_endpoint(url))
            .send()
            .await
            .map_err(|e| ScrapeError::Launch(format!("Failed to reach remote browser: {}", e)))?
            .json()
            .await
            .map_err(|e| {
                ScrapeError::Launch(format!("Failed to parse browser version info: {}", e))
            })?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ScrapeError::Launch("No webSocketDebuggerUrl in response".to_string()))?;

        info!("Connecting to WebSocket: {}", ws_url);

        let handler_config = HandlerConfig {
            request_timeout: Duration::from_secs(config.timeout),
            ..Default::default()
        };

        Browser::connect_with_config(ws_url, handler_config)
            .await
            .map_err(|e| ScrapeError::Launch(format!("Failed to connect to remote browser: {}", e)))
    }

    impl Session {
        /// Launch or connect to a browser and open the working page.
        ///
        /// The resource filter is attached before the page navigates anywhere.
        pub async fn init(config: &BrowserEngineConfig) -> Result<Self> {
            let (browser, handler) = match config.remote_url.as_deref() {
                Some(url) => connect_remote(config, url).await?,
                None => launch(config).await?,
            };
            let handler = spawn_handler(handler);
            let request_timeout = Duration::from_secs(config.timeout);
            let remote = config.remote_url.is_some();

            let opened = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ScrapeError::Launch(format!("Failed to open page: {}", e)));
            let (page, (browser, handler)) =
                unwind_on_error(opened, (browser, handler), |(browser, handler)| async move {
                    if let Err(e) = shut_down(browser, handler, remote, request_timeout).await {
                        debug!("Cleanup after failed init: {}", e);
                    }
                })
                .await?;

            let mut session = Self {
                browser,
                handler,
                page: CdpPage::new(page, request_timeout),
                filter: FilterSlot::default(),
                filter_task: None,
                headless: config.headless,
                remote,
                request_timeout,
            };

            let configured = session.configure(config).await;
            let ((), session) = unwind_on_error(configured, session, |session| async move {
                if let Err(e) = session.close().await {
                    debug!("Cleanup after failed init: {}", e);
                }
            })
            .await?;

            Ok(session)
        }

        /// Certificate tolerance, user agent and resource filter, all before
        /// the first navigation.
        async fn configure(&mut self, config: &BrowserEngineConfig) -> Result<()> {
            let page = self.page.inner();
            page.execute(SetIgnoreCertificateErrorsParams::new(true))
                .await?;
            if !config.user_agent.is_empty() {
                page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone()))
                    .await?;
            }

            if config.block_resources {
                self.block_resources(&config.blocked_resources).await?;
            }
            Ok(())
        }

        /// Set how long the network must stay quiet before navigation returns.
        pub fn with_network_idle(mut self, idle: Duration) -> Self {
            self.page.set_network_idle(idle);
            self
        }

        /// Abort requests of the given classes on this session's page.
        pub async fn block_resources(&mut self, classes: &[ResourceClass]) -> Result<()> {
            let block = BlockList::new(classes);
            if block.is_empty() {
                debug!("No resource classes to block; leaving requests alone");
                return Ok(());
            }
            debug!("Blocking resource classes: {:?}", classes);
            let page = self.page.inner();
            let task = self
                .filter
                .attach_with(|| filter::attach(page, block))
                .await?;
            self.filter_task = Some(task);
            Ok(())
        }

        pub fn page(&self) -> &CdpPage {
            &self.page
        }

        pub fn headless(&self) -> bool {
            self.headless
        }

        pub fn resource_filter_enabled(&self) -> bool {
            self.filter.is_attached()
        }

        /// Shut the browser down and wait for the handler task to finish.
        ///
        /// Remote browsers are left running; only our page is closed.
        pub async fn close(mut self) -> Result<()> {
            if let Some(task) = self.filter_task.take() {
                task.abort();
            }
            if self.remote {
                if let Err(e) = self.page.inner().clone().close().await {
                    debug!("Failed to close remote page: {}", e);
                }
            }
            shut_down(self.browser, self.handler, self.remote, self.request_timeout).await
        }
    }

    /// Close a launched browser, or just detach from a remote one.
    async fn shut_down(
        mut browser: Browser,
        mut handler: JoinHandle<()>,
        remote: bool,
        wait: Duration,
    ) -> Result<()> {
        if remote {
            handler.abort();
            return Ok(());
        }

        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        if tokio::time::timeout(wait, &mut handler).await.is_err() {
            warn!("CDP handler did not stop; aborting");
            handler.abort();
        }

        closed?;
        Ok(())
    }
}

#[cfg(feature = "browser")]
pub use session::Session;

/// Placeholder for builds without browser support. It has no values, so
/// [`Session::init`] can only fail.
#[cfg(not(feature = "browser"))]
pub enum Session {}

#[cfg(not(feature = "browser"))]
impl Session {
    pub async fn init(_config: &BrowserEngineConfig) -> Result<Self> {
        Err(ScrapeError::Launch(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        ))
    }
}
