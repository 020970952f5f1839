use crate::error::Result;
use serde_json::Value;
use sweep_core::SessionId;

/// Operations the scanner performs inside one browser session.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Identifier carried on every log line of this session
    fn session_id(&self) -> &SessionId;

    /// Navigate to a URL and wait for the main frame to finish loading
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate an expression, awaiting a returned promise, and return its
    /// value as JSON (`Null` for `undefined`)
    async fn evaluate(&self, expression: &str) -> Result<Value>;

    /// Execute a script for its side effects only
    async fn execute_script(&self, source: &str) -> Result<()>;

    /// Release the session. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Source of fresh, isolated browser sessions.
#[async_trait::async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Start a new session that shares no state with any other
    async fn launch(&self) -> Result<Box<dyn BrowserActions>>;
}
