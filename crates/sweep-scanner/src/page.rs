//! Single-page audit: one isolated session, one result, one artifact pair.

use crate::audit::{run_expression, AuditScript, ENGINE_PRESENCE_PROBE};
use crate::error::{Result, ScanError};
use crate::orchestrator::PageAuditor;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use sweep_browser::{wait_for_network_idle, BrowserActions, NetworkIdle, SessionLauncher};
use sweep_core::{PageUrl, ScanningConfig};
use sweep_reports::{ReportArtifact, ReportStore, ScanResult};
use tracing::{debug, info, warn};

/// Audits pages one session at a time and persists the findings.
pub struct PageScanner {
    launcher: Arc<dyn SessionLauncher>,
    script: AuditScript,
    store: ReportStore,
    navigation_timeout: Duration,
    idle: NetworkIdle,
}

impl PageScanner {
    /// Create a scanner with the default scanning settings.
    #[must_use]
    pub fn new(launcher: Arc<dyn SessionLauncher>, script: AuditScript, store: ReportStore) -> Self {
        let defaults = ScanningConfig::default();
        Self {
            launcher,
            script,
            store,
            navigation_timeout: Duration::from_secs(defaults.navigation_timeout_secs),
            idle: NetworkIdle::default(),
        }
        .with_scanning_config(&defaults)
    }

    /// Apply navigation budget and settle parameters from configuration.
    #[must_use]
    pub fn with_scanning_config(mut self, config: &ScanningConfig) -> Self {
        self.navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);
        self.idle = NetworkIdle {
            quiet_period: Duration::from_millis(config.idle_quiet_ms),
            poll_interval: Duration::from_millis(config.idle_poll_ms),
        };
        self
    }

    /// Set the navigation plus network settle budget.
    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the network settle parameters.
    #[must_use]
    pub fn with_network_idle(mut self, idle: NetworkIdle) -> Self {
        self.idle = idle;
        self
    }

    /// Store the artifacts are written to
    #[must_use]
    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// Audit one page in a fresh session.
    ///
    /// The session is closed whether or not the audit succeeded.
    pub async fn scan(&self, url: &PageUrl) -> Result<ScanResult> {
        let mut session = self.launcher.launch().await?;
        let outcome = self.audit_in_session(session.as_ref(), url).await;

        if let Err(e) = session.close().await {
            warn!(session_id = %session.session_id(), error = %e, "failed to close browser session");
        }

        outcome
    }

    /// Audit one page and write its artifact pair. Nothing is written when
    /// the audit fails.
    pub async fn scan_and_persist(&self, url: &PageUrl) -> Result<ReportArtifact> {
        let result = self.scan(url).await?;
        Ok(self.store.persist(&result).await?)
    }

    async fn audit_in_session(&self, session: &dyn BrowserActions, url: &PageUrl) -> Result<ScanResult> {
        info!(session_id = %session.session_id(), url = %url, "navigating");

        let settle = async {
            session.navigate(url.as_str()).await?;
            wait_for_network_idle(session, self.idle).await
        };
        tokio::time::timeout(self.navigation_timeout, settle)
            .await
            .map_err(|_| ScanError::NavigationTimeout {
                url: url.clone(),
                timeout: self.navigation_timeout,
            })??;

        self.inject_engine(session, url).await?;

        let output = session
            .evaluate(&run_expression())
            .await
            .map_err(|e| audit_err(url, e))?;
        let result = ScanResult::from_engine_output(url, output).map_err(|e| audit_err(url, e))?;

        info!(
            session_id = %session.session_id(),
            url = %url,
            violations = result.violation_count(),
            incomplete = result.incomplete_count(),
            passes = result.pass_count(),
            "{}",
            result.summary()
        );

        Ok(result)
    }

    /// Inject the engine unless the page already carries it.
    async fn inject_engine(&self, session: &dyn BrowserActions, url: &PageUrl) -> Result<()> {
        let present = session
            .evaluate(ENGINE_PRESENCE_PROBE)
            .await
            .map_err(|e| audit_err(url, e))?;

        if present == Value::Bool(true) {
            debug!(session_id = %session.session_id(), "audit engine already present");
            return Ok(());
        }

        session
            .execute_script(self.script.source())
            .await
            .map_err(|e| audit_err(url, e))
    }
}

fn audit_err(url: &PageUrl, err: impl std::fmt::Display) -> ScanError {
    ScanError::Audit {
        url: url.clone(),
        reason: err.to_string(),
    }
}

#[async_trait::async_trait]
impl PageAuditor for PageScanner {
    async fn audit(&self, url: &PageUrl) -> Result<ReportArtifact> {
        self.scan_and_persist(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use sweep_browser::idle::ACTIVITY_PROBE;
    use sweep_browser::BrowserError;
    use sweep_core::SessionId;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Journal {
        launched: usize,
        closed: usize,
        injected: usize,
    }

    #[derive(Clone, Copy)]
    enum Behavior {
        Healthy,
        EnginePreloaded,
        NavigationFails,
        NavigationHangs,
        EngineThrows,
    }

    struct FakeLauncher {
        behavior: Behavior,
        journal: Arc<Mutex<Journal>>,
    }

    struct FakeSession {
        id: SessionId,
        behavior: Behavior,
        journal: Arc<Mutex<Journal>>,
    }

    #[async_trait::async_trait]
    impl SessionLauncher for FakeLauncher {
        async fn launch(&self) -> sweep_browser::Result<Box<dyn BrowserActions>> {
            self.journal.lock().unwrap().launched += 1;
            Ok(Box::new(FakeSession {
                id: SessionId::generate(),
                behavior: self.behavior,
                journal: self.journal.clone(),
            }))
        }
    }

    #[async_trait::async_trait]
    impl BrowserActions for FakeSession {
        fn session_id(&self) -> &SessionId {
            &self.id
        }

        async fn navigate(&self, url: &str) -> sweep_browser::Result<()> {
            match self.behavior {
                Behavior::NavigationFails => {
                    Err(BrowserError::NavigationError(format!("{url}: net::ERR_NAME_NOT_RESOLVED")))
                }
                Behavior::NavigationHangs => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        async fn evaluate(&self, expression: &str) -> sweep_browser::Result<Value> {
            if expression == ACTIVITY_PROBE {
                return Ok(json!({ "readyState": "complete", "resources": 4 }));
            }
            if expression == ENGINE_PRESENCE_PROBE {
                return Ok(json!(matches!(self.behavior, Behavior::EnginePreloaded)));
            }
            if matches!(self.behavior, Behavior::EngineThrows) {
                return Err(BrowserError::ScriptError("axe is not defined".to_string()));
            }
            assert_eq!(expression, run_expression());
            Ok(json!({
                "url": "https://example.com/",
                "violations": [{ "id": "image-alt" }, { "id": "label" }],
                "incomplete": [{ "id": "color-contrast" }],
                "passes": []
            }))
        }

        async fn execute_script(&self, source: &str) -> sweep_browser::Result<()> {
            assert_eq!(source, "window.axe = {};");
            self.journal.lock().unwrap().injected += 1;
            Ok(())
        }

        async fn close(&mut self) -> sweep_browser::Result<()> {
            self.journal.lock().unwrap().closed += 1;
            Ok(())
        }
    }

    fn scanner(behavior: Behavior, dir: &std::path::Path) -> (PageScanner, Arc<Mutex<Journal>>) {
        let journal = Arc::new(Mutex::new(Journal::default()));
        let launcher = Arc::new(FakeLauncher {
            behavior,
            journal: journal.clone(),
        });
        let scanner = PageScanner::new(
            launcher,
            AuditScript::from_source("window.axe = {};"),
            ReportStore::new(dir),
        )
        .with_navigation_timeout(Duration::from_millis(200))
        .with_network_idle(NetworkIdle {
            quiet_period: Duration::from_millis(10),
            poll_interval: Duration::from_millis(2),
        });
        (scanner, journal)
    }

    fn file_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(Iterator::count).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_scan_and_persist() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, journal) = scanner(Behavior::Healthy, tmp.path());
        let url = PageUrl::new("https://example.com/");

        let artifact = scanner.scan_and_persist(&url).await.expect("scan page");

        assert!(artifact.json_path.exists());
        assert!(artifact.html_path.exists());
        let journal = journal.lock().unwrap();
        assert_eq!(journal.launched, 1);
        assert_eq!(journal.injected, 1);
        assert_eq!(journal.closed, 1);
    }

    #[tokio::test]
    async fn test_preloaded_engine_is_not_injected_twice() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, journal) = scanner(Behavior::EnginePreloaded, tmp.path());

        let result = scanner
            .scan(&PageUrl::new("https://example.com/"))
            .await
            .expect("scan page");

        assert_eq!(result.violation_count(), 2);
        assert_eq!(result.incomplete_count(), 1);
        assert_eq!(journal.lock().unwrap().injected, 0);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_session_and_writes_nothing() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, journal) = scanner(Behavior::NavigationFails, tmp.path());

        let err = scanner
            .scan_and_persist(&PageUrl::new("https://nope.invalid/"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Browser(BrowserError::NavigationError(_))));
        assert_eq!(journal.lock().unwrap().closed, 1);
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_navigation_timeout() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, journal) = scanner(Behavior::NavigationHangs, tmp.path());

        let err = scanner
            .scan_and_persist(&PageUrl::new("https://slow.example.com/"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::NavigationTimeout { .. }));
        assert_eq!(journal.lock().unwrap().closed, 1);
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_reported_with_url() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, journal) = scanner(Behavior::EngineThrows, tmp.path());

        let err = scanner
            .scan_and_persist(&PageUrl::new("https://example.com/broken"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("https://example.com/broken"));
        assert!(matches!(err, ScanError::Audit { .. }));
        assert_eq!(journal.lock().unwrap().closed, 1);
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[test]
    fn test_defaults_follow_scanning_config() {
        let tmp = TempDir::new().expect("create temp dir");
        let journal = Arc::new(Mutex::new(Journal::default()));
        let launcher = Arc::new(FakeLauncher {
            behavior: Behavior::Healthy,
            journal,
        });
        let scanner = PageScanner::new(
            launcher,
            AuditScript::from_source("window.axe = {};"),
            ReportStore::new(tmp.path()),
        );

        let defaults = ScanningConfig::default();
        assert_eq!(
            scanner.navigation_timeout,
            Duration::from_secs(defaults.navigation_timeout_secs)
        );
        assert_eq!(
            scanner.idle.quiet_period,
            Duration::from_millis(defaults.idle_quiet_ms)
        );
    }

    #[test]
    fn test_scanning_config_applies() {
        let tmp = TempDir::new().expect("create temp dir");
        let (scanner, _) = scanner(Behavior::Healthy, tmp.path());
        let scanner = scanner.with_scanning_config(&ScanningConfig {
            navigation_timeout_secs: 30,
            idle_quiet_ms: 250,
            idle_poll_ms: 50,
            ..ScanningConfig::default()
        });

        assert_eq!(scanner.navigation_timeout, Duration::from_secs(30));
        assert_eq!(scanner.idle.quiet_period, Duration::from_millis(250));
        assert_eq!(scanner.idle.poll_interval, Duration::from_millis(50));
    }
}
