//! Network-idle settle heuristic.
//!
//! The DevTools protocol has no "network idle" lifecycle we can block on
//! directly, so after navigation the page is probed until the document is
//! complete and no new resource-timing entries have appeared for a quiet
//! period. The caller bounds the whole wait with its navigation timeout.

use crate::actions::BrowserActions;
use crate::error::{BrowserError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Reports document readiness and how many subresources have been fetched.
pub const ACTIVITY_PROBE: &str = "(() => ({ \
    readyState: document.readyState, \
    resources: performance.getEntriesByType('resource').length \
}))()";

/// Settle parameters.
#[derive(Debug, Clone, Copy)]
pub struct NetworkIdle {
    /// How long the resource count must stay unchanged
    pub quiet_period: Duration,
    /// Interval between probes
    pub poll_interval: Duration,
}

impl Default for NetworkIdle {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Activity {
    ready_state: String,
    resources: u64,
}

/// Wait until the page looks settled. Never returns on a page that keeps
/// fetching, so wrap it in a timeout.
pub async fn wait_for_network_idle(actions: &dyn BrowserActions, settle: NetworkIdle) -> Result<()> {
    let mut last: Option<Activity> = None;
    let mut quiet_since = Instant::now();

    loop {
        let value = actions.evaluate(ACTIVITY_PROBE).await?;
        let activity: Activity = serde_json::from_value(value)
            .map_err(|e| BrowserError::ScriptError(format!("unexpected activity probe: {e}")))?;

        let complete = activity.ready_state == "complete";
        if !complete || last.as_ref() != Some(&activity) {
            quiet_since = Instant::now();
            last = Some(activity);
        } else if quiet_since.elapsed() >= settle.quiet_period {
            debug!(
                session_id = %actions.session_id(),
                resources = last.as_ref().map_or(0, |a| a.resources),
                "network idle"
            );
            return Ok(());
        }

        tokio::time::sleep(settle.poll_interval).await;
    }
}
