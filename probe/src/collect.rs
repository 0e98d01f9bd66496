//! Scan-and-probe collection across all detected devices.

use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;
use crate::parser::ReportParser;
use crate::report::{DeviceReport, ScanReport, build_scan_report};
use crate::runner;

/// Configuration for one collection run.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Timeout for each smartctl invocation.
    pub timeout: Duration,
    /// Number of parallel probe jobs (default: rayon's global pool size).
    pub jobs: Option<usize>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(runner::DEFAULT_TIMEOUT_SECS),
            jobs: None,
        }
    }
}

/// Scans for devices and probes each one in parallel.
///
/// The scan itself failing is an error; a probe failure on an individual
/// device is recorded in the bundle's `failures` and does not abort the run.
pub fn collect_all(smartctl: &Path, config: &CollectConfig) -> Result<ScanReport> {
    let scan_output = runner::run_scan(smartctl, config.timeout)?;
    let device_paths = runner::scan_devices(&scan_output);
    info!(count = device_paths.len(), "Scanned devices");

    let probe_one = |device: &String| -> std::result::Result<DeviceReport, String> {
        match runner::run_info(smartctl, device, config.timeout) {
            Ok(output) => Ok(DeviceReport {
                device: device.clone(),
                report: ReportParser::new(&output).parse(),
            }),
            Err(err) => {
                debug!(device = %device, error = %err, "Device probe failed");
                Err(format!("{device}: {err}"))
            }
        }
    };

    let results: Vec<std::result::Result<DeviceReport, String>> = {
        use rayon::prelude::*;
        match config.jobs {
            Some(jobs) if jobs > 0 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .expect("failed to build rayon thread pool");
                pool.install(|| device_paths.par_iter().map(probe_one).collect())
            }
            _ => device_paths.par_iter().map(probe_one).collect(),
        }
    };

    let mut devices = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(report) => devices.push(report),
            Err(failure) => failures.push(failure),
        }
    }

    Ok(build_scan_report(tool_version(smartctl), devices, failures))
}

/// Returns the first line of `smartctl --version`, when available.
fn tool_version(smartctl: &Path) -> Option<String> {
    let output = std::process::Command::new(smartctl)
        .arg("--version")
        .output()
        .ok()?;
    let raw = String::from_utf8_lossy(&output.stdout);
    let first = raw.lines().next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}
