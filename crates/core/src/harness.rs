//! Per-test setup and teardown around one browser session.
//!
//! One logical test owns one [`TestHarness`] owns one session; parallelism is
//! many independent harnesses with no cross-task shared state.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use thirtyfour::WebDriver;
use tracing::info;

use crate::actions::Actions;
use crate::artifacts::collect_failure_artifacts;
use crate::config::Settings;
use crate::driver::{PlatformKind, SessionContext, create_session};
use crate::error::{Error, Result};
use crate::nav::{Module, build_module_url};

/// Orchestrates a single test's session lifecycle: acquire, configure,
/// navigate, and finally capture-diagnostics-and-release.
pub struct TestHarness {
    settings: Settings,
    context: SessionContext,
}

impl TestHarness {
    /// Creates and registers a session, applies the configured timeouts, and
    /// maximizes the window on desktop. A failure after session start still
    /// releases the session.
    pub async fn setup(settings: Settings) -> Result<Self> {
        // Stagger concurrent session starts. Contention mitigation only.
        tokio::time::sleep(setup_jitter()).await;

        let driver = create_session(&settings).await?;
        let mut context = SessionContext::new();
        context.set(driver)?;

        let mut harness = Self { settings, context };
        if let Err(e) = harness.apply_session_defaults().await {
            harness.context.release().await;
            return Err(e);
        }
        Ok(harness)
    }

    async fn apply_session_defaults(&mut self) -> Result<()> {
        let driver = self.context.get()?;
        driver
            .set_implicit_wait_timeout(self.settings.implicit_wait()?)
            .await?;
        driver
            .set_page_load_timeout(self.settings.page_load_timeout()?)
            .await?;
        if self.settings.platform()? == PlatformKind::Dweb {
            driver.maximize_window().await?;
        }
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn driver(&self) -> Result<&WebDriver> {
        self.context.get()
    }

    /// Action primitives bound to this harness's session, using the page-load
    /// timeout as the shared wait window.
    pub fn actions(&self) -> Result<Actions> {
        Ok(Actions::new(
            self.context.get()?.clone(),
            self.settings.page_load_timeout()?,
        ))
    }

    /// Navigates to the configured `base.url`. Module suites skip this and
    /// navigate themselves via [`TestHarness::open_module`].
    pub async fn goto_base_url(&self) -> Result<()> {
        let url = self
            .settings
            .base_url()
            .ok_or_else(|| Error::Config("base.url is not configured".into()))?;
        self.context.get()?.goto(url).await?;
        Ok(())
    }

    /// Builds the module URL and navigates to it.
    pub async fn open_module(&self, module: Module, params: &[(&str, &str)]) -> Result<()> {
        let url = build_module_url(&self.settings, module, params)?;
        info!(%module, %url, "navigating to module");
        self.context.get()?.goto(url).await?;
        Ok(())
    }

    /// Ends the test: on failure, best-effort capture of screenshot and page
    /// source; always releases the session. Capture and release are isolated
    /// fault boundaries, so neither can mask the test's own outcome. Safe to
    /// call more than once.
    pub async fn teardown(&mut self, test_name: &str, passed: bool) {
        if !passed && self.settings.screenshot_on_failure() && self.context.is_active() {
            if let Ok(driver) = self.context.get() {
                let dir = PathBuf::from(self.settings.artifacts_dir());
                let saved = collect_failure_artifacts(driver, &dir, test_name).await;
                if !saved.is_empty() {
                    info!(test = test_name, count = saved.len(), "failure artifacts captured");
                }
            }
        }
        self.context.release().await;
    }
}

/// Random delay before session creation, bounded well under a second so it
/// staggers grid load without slowing the suite.
fn setup_jitter() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(0..200))
}
