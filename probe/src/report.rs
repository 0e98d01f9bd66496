//! Structured reporting for multi-device scans.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use smart_report_core::DiskReport;

/// Parsed report for one scanned device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Device path as reported by `smartctl --scan` (e.g. `/dev/sda`).
    pub device: String,
    /// Normalized report from parsing `smartctl -a` output.
    pub report: DiskReport,
}

/// Bundle of reports from one full scan-and-probe run.
///
/// Per-device failures do not abort the run; they are recorded in `failures`
/// as human-readable strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// RFC 3339 timestamp of when the bundle was built.
    pub generated_at: String,
    /// smartctl version banner, when it could be determined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
    pub devices: Vec<DeviceReport>,
    pub failures: Vec<String>,
}

/// Builds a [`ScanReport`] with the current timestamp.
pub fn build_scan_report(
    tool_version: Option<String>,
    devices: Vec<DeviceReport>,
    failures: Vec<String>,
) -> ScanReport {
    ScanReport {
        generated_at: Utc::now().to_rfc3339(),
        tool_version,
        devices,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_scan_report_populates_timestamp() {
        let bundle = build_scan_report(None, Vec::new(), vec!["/dev/sdz".to_string()]);
        assert!(bundle.generated_at.contains('T'));
        assert_eq!(bundle.failures, vec!["/dev/sdz"]);
        assert!(bundle.tool_version.is_none());
    }
}
