//! modsweep-exec: remote session abstraction
//!
//! Provides the device session traits, an SSH implementation backed by russh,
//! and the quiescence-based command runner used by the collector.

pub mod error;
pub mod executor;
pub mod ssh;
pub mod traits;

pub use error::ExecError;
pub use executor::{ExecOptions, run_device_command};
pub use traits::{Credentials, DeviceSession, SessionFactory};
