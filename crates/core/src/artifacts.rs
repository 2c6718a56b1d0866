//! Best-effort failure diagnostics: screenshot and page-source capture.
//!
//! Called from teardown when a test fails. Every step is independently
//! fault-tolerant: a capture or write failure logs a warning and moves on,
//! so a secondary failure never replaces the original test outcome.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thirtyfour::WebDriver;
use tracing::{debug, warn};

/// Captures a screenshot and the full page markup into `dir`, named
/// `{test_name}-{millis}-failure.{png,html}`. Returns the paths actually
/// written; an empty vector means nothing could be captured.
pub async fn collect_failure_artifacts(
    driver: &WebDriver,
    dir: &Path,
    test_name: &str,
) -> Vec<PathBuf> {
    let mut saved = Vec::new();

    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "cannot create artifacts directory");
        return saved;
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let screenshot_path = dir.join(format!("{test_name}-{millis}-failure.png"));
    if let Some(path) = capture_screenshot(driver, screenshot_path).await {
        saved.push(path);
    }

    let source_path = dir.join(format!("{test_name}-{millis}-failure.html"));
    if let Some(path) = capture_page_source(driver, source_path).await {
        saved.push(path);
    }

    debug!(count = saved.len(), dir = %dir.display(), "failure artifacts collected");
    saved
}

async fn capture_screenshot(driver: &WebDriver, path: PathBuf) -> Option<PathBuf> {
    let png = match driver.screenshot_as_png().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "screenshot capture failed");
            return None;
        }
    };
    match std::fs::write(&path, png) {
        Ok(()) => {
            debug!(path = %path.display(), "failure screenshot written");
            Some(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "screenshot write failed");
            None
        }
    }
}

async fn capture_page_source(driver: &WebDriver, path: PathBuf) -> Option<PathBuf> {
    let markup = match driver.source().await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "page source capture failed");
            return None;
        }
    };
    match std::fs::write(&path, markup) {
        Ok(()) => {
            debug!(path = %path.display(), "failure page source written");
            Some(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "page source write failed");
            None
        }
    }
}
