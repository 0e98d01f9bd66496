//! Running smartctl and capturing its output.
//!
//! smartctl encodes drive problems in its exit status, so a non-zero exit
//! from `smartctl -a` frequently comes with a perfectly parseable report.
//! [`run_info`] therefore returns the captured text regardless of exit
//! status; only spawn failures and timeouts are errors. `smartctl --scan`
//! has no such convention, so [`run_scan`] treats non-zero exits as failures.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ProbeError, Result};

/// Default timeout for one smartctl invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

struct CapturedRun {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Runs `smartctl -a <device>` and returns the report text.
///
/// On a non-zero exit the combined stdout and stderr are returned, since the
/// drive may be failing its self-assessment while still producing a full
/// report.
pub fn run_info(smartctl: &Path, device: &str, timeout: Duration) -> Result<String> {
    let run = run_captured(smartctl, &["-a", device], timeout)?;
    if run.status.success() {
        Ok(run.stdout)
    } else {
        debug!(
            device,
            exit_code = ?run.status.code(),
            "smartctl exited non-zero; keeping captured output"
        );
        Ok(format!("{}\n{}", run.stdout, run.stderr))
    }
}

/// Runs `smartctl --scan` and returns its output, failing on non-zero exit.
pub fn run_scan(smartctl: &Path, timeout: Duration) -> Result<String> {
    let run = run_captured(smartctl, &["--scan"], timeout)?;
    if run.status.success() {
        Ok(run.stdout)
    } else {
        let detail = if run.stderr.trim().is_empty() {
            format!("exit status {:?}", run.status.code())
        } else {
            run.stderr.trim().to_string()
        };
        Err(ProbeError::ScanFailed(detail))
    }
}

/// Splits `smartctl --scan` output into device paths.
///
/// Scan lines look like `/dev/sda -d sat # /dev/sda, ATA device`; the first
/// whitespace token of each non-empty line is the device path. This output is
/// never given to the report parser.
pub fn scan_devices(scan_output: &str) -> Vec<String> {
    scan_output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(ToOwned::to_owned)
        .collect()
}

fn run_captured(smartctl: &Path, args: &[&str], timeout: Duration) -> Result<CapturedRun> {
    let command_label = format!("{} {}", smartctl.display(), args.join(" "));
    debug!(command = %command_label, "Running smartctl");

    let mut child = Command::new(smartctl)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            command: command_label.clone(),
            source,
        })?;

    // Drain stdout and stderr in background threads to prevent deadlock when
    // the child's pipe buffer fills before it exits.
    let stdout_thread = child.stdout.take().map(|pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let mut pipe = pipe;
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_thread = child.stderr.take().map(|pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let mut pipe = pipe;
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let status = match wait_for_child_with_timeout(&mut child, timeout)? {
        Some(status) => status,
        None => {
            debug!(command = %command_label, ?timeout, "smartctl timed out, killing process");
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProbeError::Timeout {
                command: command_label,
                timeout,
            });
        }
    };

    let stdout_buf = stdout_thread
        .and_then(|t| t.join().ok())
        .unwrap_or_default();
    let stderr_buf = stderr_thread
        .and_then(|t| t.join().ok())
        .unwrap_or_default();

    Ok(CapturedRun {
        status,
        stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
    })
}

fn wait_for_child_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
