//! Error types for modsweep-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while executing a command on a remote device
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Failed to connect to the device
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Device rejected the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No output arrived within the read window
    #[error("no output received within {timeout:?}")]
    Timeout {
        /// Ceiling that was exceeded
        timeout: Duration,
    },

    /// I/O error on the session channel
    #[error("I/O error: {0}")]
    IoError(String),
}
