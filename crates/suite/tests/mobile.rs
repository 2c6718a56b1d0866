//! Live smoke test for mobile-web emulation.
//!
//! Skipped unless `GX_LIVE` is set. Uses a runtime override to flip the
//! platform rather than a separate config file, exercising the same
//! precedence path a CI matrix would.

use std::time::Duration;

use anyhow::Result;
use gx_core::{TestHarness, logging};
use gx_suite::{ImageGeneratorPage, live_enabled, suite_settings};

/// Lets the browser commit the new scroll position before reading it back.
const SCROLL_READBACK_DELAY: Duration = Duration::from_millis(500);

#[tokio::test]
async fn image_module_loads_under_device_emulation() -> Result<()> {
    if !live_enabled() {
        eprintln!("skipping image_module_loads_under_device_emulation: GX_LIVE not set");
        return Ok(());
    }
    logging::init_logging();

    let mut settings = suite_settings()?;
    settings.store_mut().set_override("platform", "mweb");

    let mut harness = TestHarness::setup(settings).await?;
    let outcome: Result<()> = async {
        let page = ImageGeneratorPage::new(harness.actions()?);
        page.open(harness.settings(), None).await?;
        page.actions().wait_until_visible(&page.heading).await?;
        Ok(())
    }
    .await;
    harness
        .teardown("image_module_loads_under_device_emulation", outcome.is_ok())
        .await;
    outcome
}

#[tokio::test]
async fn page_scrolls_both_ways_under_device_emulation() -> Result<()> {
    if !live_enabled() {
        eprintln!("skipping page_scrolls_both_ways_under_device_emulation: GX_LIVE not set");
        return Ok(());
    }
    logging::init_logging();

    let mut settings = suite_settings()?;
    settings.store_mut().set_override("platform", "mweb");

    let mut harness = TestHarness::setup(settings).await?;
    let outcome: Result<()> = async {
        let page = ImageGeneratorPage::new(harness.actions()?);
        page.open(harness.settings(), None).await?;
        page.actions().wait_until_visible(&page.heading).await?;

        let actions = harness.actions()?;
        let (_, start) = actions.scroll_offset().await?;

        actions.scroll_by_pixels(600).await?;
        tokio::time::sleep(SCROLL_READBACK_DELAY).await;
        let (_, down) = actions.scroll_offset().await?;
        anyhow::ensure!(down > start, "page did not scroll down: {start} -> {down}");

        actions.scroll_by_pixels(-600).await?;
        tokio::time::sleep(SCROLL_READBACK_DELAY).await;
        let (_, back) = actions.scroll_offset().await?;
        anyhow::ensure!(back < down, "page did not scroll back up: {down} -> {back}");
        Ok(())
    }
    .await;
    harness
        .teardown("page_scrolls_both_ways_under_device_emulation", outcome.is_ok())
        .await;
    outcome
}
