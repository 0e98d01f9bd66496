//! smartctl probing and report normalization.
//!
//! This crate turns the free-form text reports of `smartctl` (from
//! smartmontools) into normalized [`DiskReport`]s. It covers both report
//! families — ATA/SATA SMART attribute tables and NVMe health-log key/value
//! blocks — plus the thin glue around the parser: locating the smartctl
//! binary, running it with a timeout, listing devices, and formatting output.
//!
//! # Main entry points
//!
//! - [`parse_smart_output`] — parse pre-captured smartctl output without
//!   running any commands.
//! - [`probe_device`] — run `smartctl -a` against one device and parse the
//!   result (requires smartctl to be installed).
//! - [`collect::collect_all`] — scan for devices and probe all of them in
//!   parallel.
//!
//! # Example
//!
//! ```
//! use smart_report_probe::parse_smart_output;
//!
//! let output = "\
//! Device Model:     TestDisk 1TB
//! Serial Number:    ABCDEFG
//! SMART overall-health self-assessment test result: PASSED
//! ";
//!
//! let report = parse_smart_output(output);
//! assert_eq!(report.model.as_deref(), Some("TestDisk 1TB"));
//! assert_eq!(report.health.as_deref(), Some("PASSED"));
//! ```
//!
//! Parsing is total: for every input string it returns a report, degrading
//! to raw-text capture when nothing is recognized. The collaborators around
//! the parser surface real errors through [`ProbeError`].
//!
//! [`DiskReport`]: smart_report_core::DiskReport

pub mod collect;
pub mod error;
pub mod locate;
pub mod output;
pub mod parser;
pub mod report;
pub mod runner;

use std::path::Path;
use std::time::Duration;

use parser::ReportParser;
use smart_report_core::DiskReport;

pub use error::{ProbeError, Result};

/// Parses pre-captured smartctl output into a normalized report.
///
/// This is the primary offline entry point; it performs no I/O and never
/// fails. The full input is retained in the report's `raw` field.
///
/// # Examples
///
/// ```
/// use smart_report_probe::parse_smart_output;
///
/// let report = parse_smart_output("complete garbage");
/// assert!(report.is_empty());
/// assert_eq!(report.raw, "complete garbage");
/// ```
pub fn parse_smart_output(output: &str) -> DiskReport {
    ReportParser::new(output).parse()
}

/// Runs `smartctl -a` against one device and parses the captured output.
///
/// smartctl's non-zero exits for failing-but-readable drives are not errors;
/// only spawn failures and timeouts are.
pub fn probe_device(smartctl: &Path, device: &str, timeout: Duration) -> Result<DiskReport> {
    let output = runner::run_info(smartctl, device, timeout)?;
    Ok(parse_smart_output(&output))
}
