//! Browser session creation and the per-test session registry.

mod factory;
mod registry;

pub use factory::{browser_args, create_session, mobile_emulation_payload};
pub use registry::SessionContext;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported browser engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserKind {
    #[default]
    Chrome,
    Edge,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "edge" => Ok(BrowserKind::Edge),
            other => Err(Error::DriverCreation(format!(
                "unrecognized browser type: {other}"
            ))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserKind::Chrome => write!(f, "chrome"),
            BrowserKind::Edge => write!(f, "edge"),
        }
    }
}

/// Target platform: desktop web or mobile-web emulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlatformKind {
    #[default]
    Dweb,
    Mweb,
}

impl FromStr for PlatformKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dweb" => Ok(PlatformKind::Dweb),
            "mweb" => Ok(PlatformKind::Mweb),
            other => Err(Error::Config(format!("unrecognized platform: {other}"))),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Dweb => write!(f, "dweb"),
            PlatformKind::Mweb => write!(f, "mweb"),
        }
    }
}
