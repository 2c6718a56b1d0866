//! Browser session construction.
//!
//! Selects local or grid execution, applies stability flags, and injects
//! mobile emulation when the platform is mweb. Capability payloads are built
//! by pure functions so they stay testable without a live endpoint.

use serde_json::{Value, json};
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};
use tracing::info;
use url::Url;

use crate::config::Settings;
use crate::driver::{BrowserKind, PlatformKind};
use crate::error::{Error, Result};

/// Flags applied to every Chromium-family session. Parallel runs are flaky
/// without these.
const STABILITY_ARGS: &[&str] = &[
    "--disable-notifications",
    "--disable-dev-shm-usage",
    "--no-sandbox",
    "--disable-gpu",
    "--disable-background-timer-throttling",
];

/// Creates a browser session per the configured browser, platform, and
/// execution mode. Fails with [`Error::DriverCreation`] on an unrecognized
/// browser, a malformed endpoint, or a session-start failure.
pub async fn create_session(settings: &Settings) -> Result<WebDriver> {
    let browser = settings.browser()?;
    let endpoint = if settings.remote() {
        settings.grid_url()
    } else {
        settings.webdriver_url()
    };
    Url::parse(&endpoint).map_err(|e| {
        Error::DriverCreation(format!("invalid automation endpoint {endpoint}: {e}"))
    })?;

    info!(%browser, %endpoint, remote = settings.remote(), "creating browser session");

    let started = match browser {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            for arg in browser_args(settings) {
                caps.add_arg(&arg)?;
            }
            if settings.platform()? == PlatformKind::Mweb {
                caps.add_experimental_option("mobileEmulation", mobile_emulation_payload(settings)?)?;
            }
            WebDriver::new(&endpoint, caps).await
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            for arg in browser_args(settings) {
                caps.add_arg(&arg)?;
            }
            WebDriver::new(&endpoint, caps).await
        }
    };

    started.map_err(|e| {
        Error::DriverCreation(format!("session start against {endpoint} failed: {e}"))
    })
}

/// Command-line arguments for the browser process: the fixed stability set
/// plus headless when configured.
pub fn browser_args(settings: &Settings) -> Vec<String> {
    let mut args: Vec<String> = STABILITY_ARGS.iter().map(|a| a.to_string()).collect();
    if settings.headless() {
        args.push("--headless=new".to_string());
    }
    args
}

/// The `mobileEmulation` experimental option.
///
/// A non-empty device name selects named-profile emulation; otherwise the
/// payload carries device metrics plus the user agent. Never both: the
/// driver rejects payloads mixing a named profile with explicit metrics.
pub fn mobile_emulation_payload(settings: &Settings) -> Result<Value> {
    let device_name = settings.mobile_device_name();
    if !device_name.trim().is_empty() {
        return Ok(json!({ "deviceName": device_name }));
    }
    Ok(json!({
        "deviceMetrics": {
            "width": settings.mobile_width()?,
            "height": settings.mobile_height()?,
            "pixelRatio": settings.mobile_pixel_ratio()?,
        },
        "userAgent": settings.mobile_user_agent(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let mut store = ConfigStore::empty();
        for (key, value) in pairs {
            store.set_override(*key, *value);
        }
        Settings::new(store)
    }

    #[test]
    fn stability_args_always_present() {
        let args = browser_args(&settings(&[]));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
        assert!(args.contains(&"--disable-background-timer-throttling".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn headless_flag_is_config_driven() {
        let args = browser_args(&settings(&[("headless", "true")]));
        assert!(args.contains(&"--headless=new".to_string()));
    }

    #[test]
    fn named_device_profile_excludes_metrics() {
        let payload =
            mobile_emulation_payload(&settings(&[("mobile.device.name", "Pixel 7")])).unwrap();
        assert_eq!(payload["deviceName"], "Pixel 7");
        assert!(payload.get("deviceMetrics").is_none());
        assert!(payload.get("userAgent").is_none());
    }

    #[test]
    fn metrics_used_when_device_name_empty() {
        let payload = mobile_emulation_payload(&settings(&[
            ("mobile.device.name", "  "),
            ("mobile.width", "390"),
            ("mobile.height", "844"),
            ("mobile.pixel.ratio", "3.0"),
            ("mobile.user.agent", "test-agent"),
        ]))
        .unwrap();
        assert!(payload.get("deviceName").is_none());
        assert_eq!(payload["deviceMetrics"]["width"], 390);
        assert_eq!(payload["deviceMetrics"]["height"], 844);
        assert_eq!(payload["deviceMetrics"]["pixelRatio"], 3.0);
        assert_eq!(payload["userAgent"], "test-agent");
    }

    #[test]
    fn default_device_profile_is_named() {
        // With no configuration the default device name is non-empty, so the
        // named-profile branch wins.
        let payload = mobile_emulation_payload(&settings(&[])).unwrap();
        assert_eq!(payload["deviceName"], "Pixel 7");
        assert!(payload.get("deviceMetrics").is_none());
    }
}
