//! Browser automation for page auditing.
//!
//! Every scan runs in its own Chromium process with a throwaway profile
//! directory, so cookies, cache and storage never leak between pages.

pub mod actions;
pub mod engine;
pub mod error;
pub mod idle;

pub use actions::{BrowserActions, SessionLauncher};
pub use engine::{BrowserEngine, BrowserSession};
pub use error::{BrowserError, Result};
pub use idle::{wait_for_network_idle, NetworkIdle};
