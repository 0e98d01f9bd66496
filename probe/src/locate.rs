//! Locating the smartctl executable.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{ProbeError, Result};

/// Resolves smartctl on PATH via `which`.
///
/// Returns `None` when smartctl is not installed or `which` itself is
/// unavailable.
pub fn find_smartctl() -> Option<PathBuf> {
    let output = Command::new("which")
        .arg("smartctl")
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let raw = String::from_utf8_lossy(&output.stdout);
    let first = raw.lines().next().unwrap_or_default().trim();
    if first.is_empty() {
        return None;
    }
    Some(PathBuf::from(first))
}

/// Like [`find_smartctl`], but turns absence into a [`ProbeError`].
pub fn require_smartctl() -> Result<PathBuf> {
    find_smartctl().ok_or(ProbeError::NotInstalled)
}
