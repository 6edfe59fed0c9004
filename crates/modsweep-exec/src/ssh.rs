//! SSH device sessions using russh

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::keys::ssh_key;
use russh::{ChannelMsg, Disconnect, client};
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::error::ExecError;
use crate::traits::{Credentials, DeviceSession, SessionFactory};

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Accept all server keys (like StrictHostKeyChecking=no).
        // Switch fleets rarely have stable known_hosts entries.
        Ok(true)
    }
}

/// Factory opening password-authenticated SSH shells on devices
#[derive(Debug, Clone)]
pub struct SshSessionFactory {
    /// SSH port, default 22
    port: u16,
}

impl SshSessionFactory {
    /// Create a factory for the given port
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Default for SshSessionFactory {
    fn default() -> Self {
        Self::new(22)
    }
}

#[async_trait]
impl SessionFactory for SshSessionFactory {
    #[instrument(skip(self, credentials), fields(host = %host, port = self.port))]
    async fn open(
        &self,
        host: &str,
        credentials: &Credentials,
        connect_timeout: Duration,
    ) -> Result<Box<dyn DeviceSession>, ExecError> {
        info!(user = %credentials.username, "connecting to device");

        let config = Arc::new(client::Config::default());
        let handler = SshClientHandler;

        let mut handle = timeout(
            connect_timeout,
            client::connect(config, (host, self.port), handler),
        )
        .await
        .map_err(|_| {
            ExecError::ConnectionFailed(format!("connect timed out after {connect_timeout:?}"))
        })?
        .map_err(|e| ExecError::ConnectionFailed(e.to_string()))?;

        let auth_res = handle
            .authenticate_password(&credentials.username, &credentials.secret)
            .await
            .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;

        if !auth_res.success() {
            return Err(ExecError::AuthenticationFailed(
                "password rejected by device".to_string(),
            ));
        }

        // Network device CLIs only speak through an interactive shell, so
        // request a pty instead of exec-ing the command directly.
        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;
        channel
            .request_pty(false, "vt100", 80, 24, 0, 0, &[])
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;
        channel
            .request_shell(true)
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        info!("device shell ready");

        Ok(Box::new(SshDeviceSession { handle, channel }))
    }
}

/// Interactive shell on one device
///
/// Exclusively owned by the task collecting that host; released through
/// [`DeviceSession::close`] on every exit path.
pub struct SshDeviceSession {
    handle: client::Handle<SshClientHandler>,
    channel: russh::Channel<client::Msg>,
}

#[async_trait]
impl DeviceSession for SshDeviceSession {
    async fn send_line(&mut self, line: &str) -> Result<(), ExecError> {
        debug!(line = %line, "sending input line");
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))
    }

    async fn read_chunk(&mut self) -> Result<Option<String>, ExecError> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
                }
                Some(ChannelMsg::ExtendedData { data, .. }) => {
                    return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
                }
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => return Ok(None),
                Some(_) => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), ExecError> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;
        debug!("session disconnected");
        Ok(())
    }
}
