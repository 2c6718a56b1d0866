//! Page objects and helpers for the Galaxy UI test suite.
//!
//! Live tests drive a real browser against the product; they are opt-in via
//! the `GX_LIVE` environment switch so the unit suite never needs a
//! WebDriver endpoint.

pub mod pages;

pub use pages::{ImageGeneratorPage, SignInPage, SignUpPage};

use gx_core::{ConfigStore, Result, Settings};

/// Environment switch enabling the live-browser tests.
pub const LIVE_ENV: &str = "GX_LIVE";

/// Whether live-browser tests should run in this process.
pub fn live_enabled() -> bool {
    std::env::var_os(LIVE_ENV).is_some()
}

/// Loads the suite's checked-in configuration. Any key can still be
/// overridden through the environment, so CI can flip browser, platform, or
/// endpoints without touching the file.
pub fn suite_settings() -> Result<Settings> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/gx.toml");
    Ok(Settings::new(ConfigStore::load(path)?))
}
