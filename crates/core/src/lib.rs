//! Core framework for browser-based UI tests against the Galaxy generation
//! modules (image, video, audio).
//!
//! The pieces, leaf to root:
//!
//! - [`config`] — layered resolution: runtime override, environment, TOML
//!   file; [`Settings`] adds typed accessors.
//! - [`driver`] — session creation (local or grid, desktop or mobile
//!   emulation) and the per-test [`SessionContext`] registry.
//! - [`actions`] — shared wait-act-query primitives page objects compose
//!   instead of inheriting from a base page.
//! - [`nav`] — module URL construction from subdomain and base-path
//!   configuration.
//! - [`harness`] — per-test orchestration: acquire, configure, navigate,
//!   capture diagnostics on failure, release.
//!
//! A test drives it roughly as:
//!
//! ```ignore
//! let mut harness = TestHarness::setup(Settings::load_default()?).await?;
//! harness.open_module(Module::Image, &[("model", "nano-banana-pro")]).await?;
//! let actions = harness.actions()?;
//! actions.type_text(&By::Css("#prompt"), "a sunset over mountains").await?;
//! harness.teardown("my_test", true).await;
//! ```

pub mod actions;
pub mod artifacts;
pub mod config;
pub mod driver;
pub mod error;
pub mod harness;
pub mod logging;
pub mod nav;

pub use actions::Actions;
pub use config::{ConfigStore, Settings};
pub use driver::{BrowserKind, PlatformKind, SessionContext, create_session};
pub use error::{Error, Result};
pub use harness::TestHarness;
pub use nav::{Module, build_module_url};

// Locators are thirtyfour's `By`; re-exported so page objects and tests
// need no direct dependency for the common case.
pub use thirtyfour::By;
