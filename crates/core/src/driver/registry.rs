//! Per-test session registry.
//!
//! Each executing test owns one [`SessionContext`]; parallelism is many
//! independent contexts, so no handle is ever visible across execution units
//! and no locking is needed. The state machine is UNSET -> ACTIVE -> UNSET.

use thirtyfour::WebDriver;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Owns at most one browser session for a single execution unit.
///
/// Generic over the handle type so the lifecycle rules stay testable without
/// a live session; production code always uses the default.
#[derive(Debug)]
pub struct SessionContext<D = WebDriver> {
    driver: Option<D>,
}

impl<D> Default for SessionContext<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> SessionContext<D> {
    pub fn new() -> Self {
        Self { driver: None }
    }

    /// Registers the active session. Registering while one is already active
    /// is a lifecycle error: the factory and registry are used in strict
    /// sequence, never concurrently for the same execution unit.
    pub fn set(&mut self, driver: D) -> Result<()> {
        if self.driver.is_some() {
            return Err(Error::SessionLifecycle(
                "a session is already active for this execution context".into(),
            ));
        }
        self.driver = Some(driver);
        Ok(())
    }

    /// Returns the active session.
    pub fn get(&self) -> Result<&D> {
        self.driver.as_ref().ok_or_else(|| {
            Error::SessionLifecycle("no active session for this execution context".into())
        })
    }

    pub fn is_active(&self) -> bool {
        self.driver.is_some()
    }

    /// Removes and returns the session, leaving the context UNSET. Safe to
    /// call repeatedly.
    pub fn clear(&mut self) -> Option<D> {
        self.driver.take()
    }
}

impl SessionContext<WebDriver> {
    /// Quits the session when one is present.
    ///
    /// Idempotent, and never raises: quitting a broken or already-closed
    /// session logs a warning and proceeds, because cleanup must not fail a
    /// passing test or mask a failing one's diagnostics.
    pub async fn release(&mut self) {
        let Some(driver) = self.clear() else {
            return;
        };
        match driver.quit().await {
            Ok(()) => debug!("session released"),
            Err(e) => warn!(error = %e, "session quit failed during cleanup"),
        }
    }
}
