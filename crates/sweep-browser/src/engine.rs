use crate::actions::{BrowserActions, SessionLauncher};
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use serde_json::Value;
use std::time::Duration;
use sweep_core::{BrowserConfig, SessionId};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launches one Chromium process per session.
#[derive(Debug, Clone)]
pub struct BrowserEngine {
    settings: BrowserConfig,
    request_timeout: Duration,
}

impl BrowserEngine {
    /// Create a new browser engine with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(BrowserConfig::default())
    }

    /// Create a new browser engine with specific settings
    #[must_use]
    pub fn with_settings(settings: BrowserConfig) -> Self {
        Self {
            settings,
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Upper bound for a single DevTools command (navigation included)
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Start a fresh browser with its own throwaway profile directory.
    pub async fn open_session(&self) -> Result<BrowserSession> {
        let id = SessionId::generate();
        let profile_dir = tempfile::Builder::new()
            .prefix("sweep-session-")
            .tempdir()?;

        let mut builder = ChromeConfig::builder()
            .user_data_dir(profile_dir.path())
            .window_size(self.settings.window_width, self.settings.window_height)
            .request_timeout(self.request_timeout);
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler_session = id.clone();
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(session_id = %handler_session, error = %e, "browser handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut session = BrowserSession {
                    id,
                    browser: Some(browser),
                    page: None,
                    handler_task,
                    _profile_dir: profile_dir,
                };
                session.shutdown().await;
                return Err(BrowserError::ChromiumError(e.to_string()));
            }
        };

        info!(session_id = %id, "browser session opened");

        Ok(BrowserSession {
            id,
            browser: Some(browser),
            page: Some(page),
            handler_task,
            _profile_dir: profile_dir,
        })
    }
}

impl Default for BrowserEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionLauncher for BrowserEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserActions>> {
        Ok(Box::new(self.open_session().await?))
    }
}

/// A single browser process with one page.
pub struct BrowserSession {
    id: SessionId,
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    // Removed from disk when the session is dropped
    _profile_dir: TempDir,
}

impl BrowserSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::SessionClosed(self.id.to_string()))
    }

    async fn run(&self, expression: &str, await_result: bool) -> Result<Option<Value>> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(await_result)
            .return_by_value(await_result)
            .build()
            .map_err(BrowserError::ScriptError)?;

        let result = self
            .page()?
            .evaluate_expression(params)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        Ok(result.value().cloned())
    }

    async fn shutdown(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!(session_id = %self.id, error = %e, "page close failed");
            }
        }
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!(session_id = %self.id, error = %e, "browser close failed");
            }
            if let Err(e) = browser.wait().await {
                warn!(session_id = %self.id, error = %e, "browser process did not exit cleanly");
            }
        }
        self.handler_task.abort();
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserSession {
    fn session_id(&self) -> &SessionId {
        &self.id
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!(session_id = %self.id, url, "navigating");
        let page = self.page()?;
        page.goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value> {
        Ok(self.run(expression, true).await?.unwrap_or(Value::Null))
    }

    async fn execute_script(&self, source: &str) -> Result<()> {
        self.run(source, false).await.map(|_| ())
    }

    async fn close(&mut self) -> Result<()> {
        if self.browser.is_some() {
            self.shutdown().await;
            info!(session_id = %self.id, "browser session closed");
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
