use std::time::Duration;
use thiserror::Error;

/// Error taxonomy for a provisioning run, with per-kind exit codes.
///
/// Stage code raises these through `anyhow::Result`; the workflow runner is
/// the single catch point and uses `From<anyhow::Error>` to recover the
/// concrete kind before folding everything into a boolean outcome.
#[derive(Debug, Error)]
pub enum AwxpilotError {
    /// No environment profile registered under this name (exit code 6)
    #[error("unknown profile '{0}' (expected one of: dev, stage, prod)")]
    UnknownProfile(String),

    /// The WebDriver session could not be established (exit code 4)
    #[error("could not establish a browser session: {0}")]
    SessionStart(String),

    /// An expected UI element was absent when required (exit code 2)
    #[error("no element matching '{0}' on the current page")]
    ElementNotFound(String),

    /// Condition polling expired before the element appeared (exit code 5)
    #[error("timed out after {timeout:?} waiting for '{selector}'")]
    WaitTimeout { selector: String, timeout: Duration },

    /// AWX never showed the authenticated-page marker (exit code 3)
    #[error("AWX rejected the login credentials")]
    LoginFailed,

    /// Generic error (exit code 1)
    #[error(transparent)]
    Other(anyhow::Error),
}

impl AwxpilotError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AwxpilotError::ElementNotFound(_) => 2,
            AwxpilotError::LoginFailed => 3,
            AwxpilotError::SessionStart(_) => 4,
            AwxpilotError::WaitTimeout { .. } => 5,
            AwxpilotError::UnknownProfile(_) => 6,
            AwxpilotError::Other(_) => 1,
        }
    }
}

impl From<anyhow::Error> for AwxpilotError {
    /// Recover the typed variant from an `anyhow` chain, if one was raised.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AwxpilotError>() {
            Ok(typed) => typed,
            Err(err) => AwxpilotError::Other(err),
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
