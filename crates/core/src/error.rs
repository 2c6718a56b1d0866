//! Error types for the test framework.

use thiserror::Error;

/// Result type alias for framework operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the framework.
///
/// Cleanup paths (failure-artifact capture, session release) log and swallow
/// their own errors instead of producing these; everything else propagates to
/// the test unmodified.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing or unreadable, or a value failed to parse.
    /// Fatal at startup or first access.
    #[error("configuration error: {0}")]
    Config(String),

    /// Browser session could not be created: unrecognized browser type,
    /// malformed automation endpoint, or session start failure.
    #[error("driver creation failed: {0}")]
    DriverCreation(String),

    /// Session registry misuse: no active session where one was expected, or
    /// a second session registered before the first was released.
    #[error("session lifecycle error: {0}")]
    SessionLifecycle(String),

    /// A wait condition was not satisfied within the configured window.
    #[error("timeout after {ms}ms waiting for {condition}: {locator}")]
    Timeout {
        ms: u64,
        locator: String,
        condition: &'static str,
    },

    /// An action targeting a located element failed for a reason other than
    /// absence, e.g. a shadow-DOM traversal resolving to null.
    #[error("element interaction failed for {selector}: {message}")]
    ElementInteraction { selector: String, message: String },

    /// Underlying WebDriver session failure.
    #[error(transparent)]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this error is a wait-condition timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
