//! Shared wait-act-query primitives over an active browser session.
//!
//! Page objects hold an [`Actions`] by value and call these primitives
//! instead of inheriting from a base page. Every locator-taking operation
//! first resolves its element through one of three wait strategies:
//!
//! * visible — exists with a non-zero rendered size; read/click/type,
//! * present — exists in the document regardless of visibility; hidden file
//!   inputs and script-driven interaction,
//! * clickable — visible and not obscured or disabled.
//!
//! All waits share one timeout and a fixed polling interval; exceeding it
//! fails with [`Error::Timeout`] naming the locator and the condition.
//!
//! The script-based variants (`type_via_script`, `click_via_script`) exist
//! because the application is built on a reactive UI framework that tracks
//! input value through property interception; synthetic keystrokes from the
//! driver can miss its change detection entirely.

use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::Key;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};

/// Fixed polling interval for every wait. Bounded retry, no backoff.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Settle delay after scroll effects, covering smooth-scroll animation.
const SCROLL_SETTLE: Duration = Duration::from_millis(300);

/// Sets an input's value through the native property setter of its own
/// prototype, then synthesizes bubbling `input` and `change` events.
const SET_VALUE_SCRIPT: &str = "\
    const el = arguments[0];\
    const proto = el.tagName === 'TEXTAREA'\
        ? window.HTMLTextAreaElement.prototype\
        : window.HTMLInputElement.prototype;\
    Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, arguments[1]);\
    el.dispatchEvent(new Event('input', { bubbles: true }));\
    el.dispatchEvent(new Event('change', { bubbles: true }));";

/// Resolves an element one level inside a shadow root.
const SHADOW_QUERY_SCRIPT: &str = "\
    const host = document.querySelector(arguments[0]);\
    return host && host.shadowRoot ? host.shadowRoot.querySelector(arguments[1]) : null;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitFor {
    Visible,
    Present,
    Clickable,
}

impl WaitFor {
    fn describe(self) -> &'static str {
        match self {
            WaitFor::Visible => "visible",
            WaitFor::Present => "present in DOM",
            WaitFor::Clickable => "clickable",
        }
    }
}

/// Wait-act-query primitives bound to one active session.
///
/// Cheap to clone; the underlying session handle is shared.
#[derive(Debug, Clone)]
pub struct Actions {
    driver: WebDriver,
    timeout: Duration,
}

impl Actions {
    pub fn new(driver: WebDriver, timeout: Duration) -> Self {
        Self { driver, timeout }
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// The shared wait timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same session with a different wait timeout; for the handful of flows
    /// (dialog loads, generation waits) that need their own window.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            driver: self.driver.clone(),
            timeout,
        }
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    /// Waits for the element to be clickable, then clicks it.
    pub async fn click(&self, locator: &By) -> Result<()> {
        self.resolve(locator, WaitFor::Clickable).await?.click().await?;
        Ok(())
    }

    /// Waits for visibility, clears the field, and sends the characters.
    pub async fn type_text(&self, locator: &By, text: &str) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Visible).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        Ok(())
    }

    /// Sets the value through the framework's native property setter and
    /// synthesizes `input` plus `change` events. Waits for presence only, so
    /// it also works on fields the page keeps hidden.
    pub async fn type_via_script(&self, locator: &By, text: &str) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Present).await?;
        self.driver
            .execute(
                SET_VALUE_SCRIPT,
                vec![element.to_json()?, Value::String(text.to_string())],
            )
            .await?;
        Ok(())
    }

    /// Select-all (Cmd+A on macOS hosts, Ctrl+A elsewhere) then backspace.
    pub async fn clear_via_keyboard(&self, locator: &By) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Visible).await?;
        element.send_keys(select_all_chord()).await?;
        element.send_keys(char::from(Key::Backspace).to_string()).await?;
        Ok(())
    }

    /// Visible text of the element.
    pub async fn text(&self, locator: &By) -> Result<String> {
        Ok(self.resolve(locator, WaitFor::Visible).await?.text().await?)
    }

    /// A DOM attribute of the element, `None` when absent.
    pub async fn attr(&self, locator: &By, name: &str) -> Result<Option<String>> {
        Ok(self
            .resolve(locator, WaitFor::Visible)
            .await?
            .attr(name)
            .await?)
    }

    /// The `value` attribute, empty string when absent.
    pub async fn value(&self, locator: &By) -> Result<String> {
        Ok(self.attr(locator, "value").await?.unwrap_or_default())
    }

    /// Boolean visibility query: `Ok(false)` when the element never becomes
    /// visible within the timeout, `Err` only on underlying session failure.
    pub async fn is_displayed(&self, locator: &By) -> Result<bool> {
        Ok(self
            .driver
            .query(locator.clone())
            .wait(self.timeout, POLL_INTERVAL)
            .and_displayed()
            .exists()
            .await?)
    }

    /// Sends an absolute path to a file input. Waits for presence, not
    /// visibility: file inputs are typically hidden behind styled buttons.
    pub async fn upload_file(&self, locator: &By, path: &Path) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Present).await?;
        element.send_keys(path.to_string_lossy().as_ref()).await?;
        Ok(())
    }

    /// Programmatic click bypassing overlay and visibility checks.
    pub async fn click_via_script(&self, locator: &By) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Present).await?;
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        Ok(())
    }

    /// Smooth-scrolls the element into the viewport center and settles.
    pub async fn scroll_to(&self, locator: &By) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Present).await?;
        self.driver
            .execute(
                "arguments[0].scrollIntoView({behavior: 'smooth', block: 'center', inline: 'nearest'});",
                vec![element.to_json()?],
            )
            .await?;
        tokio::time::sleep(SCROLL_SETTLE).await;
        Ok(())
    }

    /// Scrolls so the element's top sits at the viewport center, computed
    /// from coordinates. More reliable than `scrollIntoView` for elements
    /// inside custom scroll containers.
    pub async fn scroll_to_by_coordinates(&self, locator: &By) -> Result<()> {
        let element = self.resolve(locator, WaitFor::Present).await?;
        self.driver
            .execute(
                "const r = arguments[0].getBoundingClientRect();\
                 window.scrollTo(0, window.scrollY + r.top - window.innerHeight / 2);",
                vec![element.to_json()?],
            )
            .await?;
        tokio::time::sleep(SCROLL_SETTLE).await;
        Ok(())
    }

    pub async fn scroll_by_pixels(&self, pixels: i64) -> Result<()> {
        self.driver
            .execute("window.scrollBy(0, arguments[0]);", vec![json!(pixels)])
            .await?;
        Ok(())
    }

    /// Current page scroll offset as `(x, y)`.
    pub async fn scroll_offset(&self) -> Result<(f64, f64)> {
        let ret = self
            .driver
            .execute("return [window.scrollX, window.scrollY];", vec![])
            .await?;
        let offset: (f64, f64) = serde_json::from_value(ret.json().clone())
            .map_err(|e| Error::ElementInteraction {
                selector: "window".into(),
                message: format!("unreadable scroll offset: {e}"),
            })?;
        Ok(offset)
    }

    /// Clicks an element one level inside a shadow root, located by a host
    /// selector plus an inner selector.
    pub async fn click_shadow_element(&self, host_css: &str, inner_css: &str) -> Result<()> {
        let element = self.shadow_element(host_css, inner_css).await?;
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        Ok(())
    }

    /// Sends a file path to the `input[type="file"]` inside a shadow root.
    pub async fn upload_file_to_shadow_dom(&self, host_css: &str, path: &Path) -> Result<()> {
        let element = self.shadow_element(host_css, "input[type=\"file\"]").await?;
        element.send_keys(path.to_string_lossy().as_ref()).await?;
        Ok(())
    }

    async fn shadow_element(&self, host_css: &str, inner_css: &str) -> Result<WebElement> {
        let ret = self
            .driver
            .execute(SHADOW_QUERY_SCRIPT, vec![json!(host_css), json!(inner_css)])
            .await?;
        if ret.json().is_null() {
            return Err(Error::ElementInteraction {
                selector: format!("{host_css} >> {inner_css}"),
                message: "shadow DOM element not found".into(),
            });
        }
        Ok(ret.element()?)
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    /// Whether the current URL carries `name=expected` as a query parameter.
    pub async fn url_contains_query_param(&self, name: &str, expected: &str) -> Result<bool> {
        Ok(has_query_param(&self.current_url().await?, name, expected))
    }

    /// Polls the current URL until it contains `part`.
    pub async fn wait_for_url_contains(&self, part: &str) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if self.current_url().await?.contains(part) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    ms: self.timeout.as_millis() as u64,
                    locator: format!("current url containing {part:?}"),
                    condition: "url match",
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// All elements matching the locator, after at least one is present.
    pub async fn elements(&self, locator: &By) -> Result<Vec<WebElement>> {
        self.resolve(locator, WaitFor::Present).await?;
        Ok(self.driver.find_all(locator.clone()).await?)
    }

    /// Visible text of every matching element.
    pub async fn all_texts(&self, locator: &By) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.elements(locator).await? {
            texts.push(element.text().await?);
        }
        Ok(texts)
    }

    /// Count of matching elements right now. No wait; zero is a valid answer.
    pub async fn element_count(&self, locator: &By) -> Result<usize> {
        Ok(self.driver.find_all(locator.clone()).await?.len())
    }

    pub async fn wait_until_visible(&self, locator: &By) -> Result<WebElement> {
        self.resolve(locator, WaitFor::Visible).await
    }

    pub async fn wait_until_present(&self, locator: &By) -> Result<WebElement> {
        self.resolve(locator, WaitFor::Present).await
    }

    pub async fn wait_until_clickable(&self, locator: &By) -> Result<WebElement> {
        self.resolve(locator, WaitFor::Clickable).await
    }

    /// Waits for the element to leave the document. Returns whether it was
    /// gone before `timeout`; never errors on expiry, since dismissal flows
    /// race against the element already being removed.
    pub async fn wait_until_gone(&self, locator: &By, timeout: Duration) -> Result<bool> {
        Ok(self
            .driver
            .query(locator.clone())
            .wait(timeout, POLL_INTERVAL)
            .not_exists()
            .await?)
    }

    /// Polls the element's `value` attribute until the predicate holds.
    /// Returns whether it held before `timeout`; an element not yet in the
    /// document counts as not-yet, not as an error.
    pub async fn wait_for_value<F>(&self, locator: &By, timeout: Duration, pred: F) -> Result<bool>
    where
        F: Fn(&str) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            match self.driver.find(locator.clone()).await {
                Ok(element) => match element.attr("value").await {
                    Ok(Some(value)) if pred(&value) => return Ok(true),
                    Ok(_) => {}
                    Err(e) if wait_expired(&e) => {}
                    Err(e) => return Err(e.into()),
                },
                Err(e) if wait_expired(&e) => {}
                Err(e) => return Err(e.into()),
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Raw script passthrough for page code whose needs the primitives above
    /// do not cover.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<ScriptRet> {
        Ok(self.driver.execute(script, args).await?)
    }

    async fn resolve(&self, locator: &By, wait: WaitFor) -> Result<WebElement> {
        let query = self
            .driver
            .query(locator.clone())
            .wait(self.timeout, POLL_INTERVAL);
        let query = match wait {
            WaitFor::Visible => query.and_displayed(),
            WaitFor::Clickable => query.and_clickable(),
            WaitFor::Present => query,
        };
        query.first().await.map_err(|e| {
            if wait_expired(&e) {
                debug!(locator = ?locator, condition = wait.describe(), "wait expired");
                Error::Timeout {
                    ms: self.timeout.as_millis() as u64,
                    locator: format!("{locator:?}"),
                    condition: wait.describe(),
                }
            } else {
                Error::WebDriver(e)
            }
        })
    }
}

/// Whether the error means the wait simply expired, as opposed to the
/// session itself failing. Only absence-style errors qualify; a dead
/// session must surface as [`Error::WebDriver`], never as a timeout.
fn wait_expired(error: &WebDriverError) -> bool {
    matches!(
        error,
        WebDriverError::NoSuchElement(_) | WebDriverError::StaleElementReference(_)
    )
}

/// Whether `url` carries `name=expected` as a whole query-string pair.
/// Matching whole pairs keeps `remodel=x` from satisfying a check for
/// `model=x`.
fn has_query_param(url: &str, name: &str, expected: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .any(|pair| pair.split_once('=') == Some((name, expected)))
}

/// Platform-appropriate select-all chord. The modifier stays held for the
/// rest of the `send_keys` call, which is exactly the chord semantics.
fn select_all_chord() -> String {
    let modifier = if cfg!(target_os = "macos") {
        Key::Meta
    } else {
        Key::Control
    };
    format!("{}a", char::from(modifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_all_chord_ends_with_a() {
        let chord = select_all_chord();
        assert_eq!(chord.chars().count(), 2);
        assert!(chord.ends_with('a'));
    }

    #[test]
    fn set_value_script_dispatches_both_events() {
        assert!(SET_VALUE_SCRIPT.contains("new Event('input'"));
        assert!(SET_VALUE_SCRIPT.contains("new Event('change'"));
        assert!(SET_VALUE_SCRIPT.contains("getOwnPropertyDescriptor"));
    }

    #[test]
    fn session_failures_do_not_count_as_wait_expiry() {
        assert!(wait_expired(&WebDriverError::NoSuchElement(
            thirtyfour::error::WebDriverErrorInfo::new(String::new())
        )));
        assert!(wait_expired(&WebDriverError::StaleElementReference(
            thirtyfour::error::WebDriverErrorInfo::new(String::new())
        )));
        assert!(!wait_expired(&WebDriverError::RequestFailed(
            "tcp connection closed".into()
        )));
    }

    #[test]
    fn query_param_match_is_anchored_on_whole_pairs() {
        let url = "https://image.galaxy.ai/ai-image-generator?remodel=x&model=nano-banana-pro";
        assert!(has_query_param(url, "model", "nano-banana-pro"));
        assert!(has_query_param(url, "remodel", "x"));
        assert!(!has_query_param(url, "model", "x"));
        assert!(!has_query_param(url, "odel", "nano-banana-pro"));
        assert!(!has_query_param(url, "model", "nano"));
        assert!(!has_query_param("https://image.galaxy.ai/path", "model", "x"));
    }

    #[test]
    fn wait_conditions_have_distinct_descriptions() {
        let described: std::collections::BTreeSet<_> =
            [WaitFor::Visible, WaitFor::Present, WaitFor::Clickable]
                .iter()
                .map(|w| w.describe())
                .collect();
        assert_eq!(described.len(), 3);
    }
}
