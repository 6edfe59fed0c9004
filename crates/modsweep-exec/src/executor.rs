//! Quiescence-based command runner
//!
//! Network devices stream output at irregular rates and have no fixed
//! terminator, so the runner keeps reading until the channel has been quiet
//! for an idle window or an absolute ceiling is reached.

use std::time::Duration;

use tokio::time::{Instant, timeout};
use tracing::{debug, instrument, warn};

use crate::error::ExecError;
use crate::traits::{Credentials, DeviceSession, SessionFactory};

/// Timing knobs for one device command
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Ceiling for connect plus authentication
    pub connect_timeout: Duration,
    /// Output silence that ends a read
    pub idle_window: Duration,
    /// Absolute ceiling for one read
    pub read_ceiling: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            idle_window: Duration::from_secs(2),
            read_ceiling: Duration::from_secs(30),
        }
    }
}

/// Drain loop state: `Waiting` until the first chunk arrives, `Draining`
/// afterwards. Exiting the loop is the terminal state.
enum DrainState {
    Waiting,
    Draining,
}

/// Execute one diagnostic command on one device
///
/// Opens a session, disables output pagination, issues the command, and
/// drains the response until the device goes quiet. The session is released
/// on every exit path, including timeouts.
///
/// # Errors
/// Returns `ExecError` on connection, authentication, channel, or timeout
/// failures. Never retries; retry policy belongs to the caller.
#[instrument(skip(factory, credentials, opts), fields(host = %host))]
pub async fn run_device_command(
    factory: &dyn SessionFactory,
    host: &str,
    credentials: &Credentials,
    command: &str,
    opts: &ExecOptions,
) -> Result<String, ExecError> {
    let mut session = factory.open(host, credentials, opts.connect_timeout).await?;

    let result = issue_command(session.as_mut(), command, opts).await;

    if let Err(e) = session.close().await {
        warn!(host = %host, error = %e, "failed to release session");
    }

    result
}

async fn issue_command(
    session: &mut dyn DeviceSession,
    command: &str,
    opts: &ExecOptions,
) -> Result<String, ExecError> {
    // Login banner and initial prompt. Some devices print nothing here.
    absorb(session, opts).await?;

    // Disable pagination so multi-page output is not truncated, then drop
    // the echo and prompt it produces.
    session.send_line("terminal length 0").await?;
    absorb(session, opts).await?;

    session.send_line(command).await?;

    let output = drain_until_quiet(session, opts.idle_window, opts.read_ceiling).await?;

    debug!(bytes = output.len(), "command output drained");

    Ok(output)
}

/// Drain output that may legitimately be absent
async fn absorb(session: &mut dyn DeviceSession, opts: &ExecOptions) -> Result<(), ExecError> {
    match drain_until_quiet(session, opts.idle_window, opts.read_ceiling).await {
        Ok(_) | Err(ExecError::Timeout { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Read until the channel has been idle for `idle_window` or `ceiling` has
/// elapsed
///
/// Every chunk arrival re-arms the idle window. While still `Waiting` for
/// the first chunk, idle expiries keep waiting; only the ceiling turns into
/// `ExecError::Timeout`. Once `Draining`, idle expiry or the ceiling
/// completes the read with whatever has accumulated.
async fn drain_until_quiet(
    session: &mut dyn DeviceSession,
    idle_window: Duration,
    ceiling: Duration,
) -> Result<String, ExecError> {
    let deadline = Instant::now() + ceiling;
    let mut state = DrainState::Waiting;
    let mut output = String::new();

    loop {
        let now = Instant::now();
        if now >= deadline {
            match state {
                DrainState::Waiting => return Err(ExecError::Timeout { timeout: ceiling }),
                DrainState::Draining => break,
            }
        }

        let window = idle_window.min(deadline - now);
        match timeout(window, session.read_chunk()).await {
            Ok(Ok(Some(chunk))) => {
                output.push_str(&chunk);
                state = DrainState::Draining;
            }
            // Remote side closed the channel
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(e),
            Err(_) => match state {
                DrainState::Waiting => {}
                DrainState::Draining => break,
            },
        }
    }

    Ok(output)
}
