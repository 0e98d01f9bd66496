//! Error types for smartctl probing.
//!
//! The report parser itself is total and has no error type; these errors
//! cover the collaborators around it: locating the smartctl binary, spawning
//! it, and listing devices.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while locating or running smartctl.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// smartctl is not installed or not on PATH.
    #[error("smartctl not found. Please install smartmontools.")]
    NotInstalled,

    /// Spawning the child process failed.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process did not finish within the timeout.
    #[error("'{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// `smartctl --scan` exited with an error.
    #[error("smartctl --scan failed: {0}")]
    ScanFailed(String),

    /// Other I/O failure while talking to the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`ProbeError`].
pub type Result<T> = std::result::Result<T, ProbeError>;
