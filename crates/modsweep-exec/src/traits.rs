//! Session capability traits

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;

/// Login credentials shared by every host in a run
///
/// Acquired once and passed by value into each per-host task so that
/// tasks stay independently testable.
#[derive(Clone)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password or enable secret
    pub secret: String,
}

impl Credentials {
    /// Create new credentials
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One interactive command channel to a single device
///
/// Implementations own the underlying transport for their entire lifetime.
/// `read_chunk` resolves when the device emits data and returns `None` once
/// the remote side closes the channel.
#[async_trait]
pub trait DeviceSession: Send {
    /// Send one line of input, terminated with a newline
    async fn send_line(&mut self, line: &str) -> Result<(), ExecError>;

    /// Wait for the next chunk of output
    async fn read_chunk(&mut self) -> Result<Option<String>, ExecError>;

    /// Release the session
    async fn close(&mut self) -> Result<(), ExecError>;
}

/// Opens authenticated sessions to devices
///
/// The collector and tests substitute simulated sessions through this trait;
/// production plugs in [`crate::ssh::SshSessionFactory`].
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Connect and authenticate to `host` within `connect_timeout`
    async fn open(
        &self,
        host: &str,
        credentials: &Credentials,
        connect_timeout: Duration,
    ) -> Result<Box<dyn DeviceSession>, ExecError>;
}
