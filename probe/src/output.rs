//! Output formatting for disk reports and scan bundles.

use serde::Serialize;

use crate::report::ScanReport;
use smart_report_core::DiskReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a single device report.
///
/// The raw smartctl dump is stripped from serialized output unless
/// `include_raw` is set; the table format never shows it.
pub fn format_report(
    report: &DiskReport,
    format: OutputFormat,
    include_raw: bool,
) -> Result<String, String> {
    let owned;
    let serializable = if include_raw {
        report
    } else {
        owned = report.without_raw();
        &owned
    };
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(serializable)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(serializable)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats a scan bundle, applying the same raw-stripping policy per device.
pub fn format_scan_report(
    bundle: &ScanReport,
    format: OutputFormat,
    include_raw: bool,
) -> Result<String, String> {
    let serializable = if include_raw {
        bundle.clone()
    } else {
        let mut stripped = bundle.clone();
        for device in &mut stripped.devices {
            device.report = device.report.without_raw();
        }
        stripped
    };
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serializable)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(&serializable)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Table => Ok(scan_report_to_table(bundle)),
    }
}

/// Formats a device path listing from `smartctl --scan`.
///
/// The table format is one path per line; JSON and YAML wrap the paths in a
/// `devices` key.
pub fn format_device_list(devices: &[String], format: OutputFormat) -> Result<String, String> {
    #[derive(Serialize)]
    struct DeviceList<'a> {
        devices: &'a [String],
    }

    let list = DeviceList { devices };
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&list)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&list).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(devices.join("\n") + "\n"),
    }
}

fn report_to_table(report: &DiskReport) -> String {
    let mut out = String::new();

    let n_a = "n/a";
    out.push_str(&format!(
        "Model:    {}\n",
        report.model.as_deref().unwrap_or(n_a)
    ));
    out.push_str(&format!(
        "Serial:   {}\n",
        report.serial.as_deref().unwrap_or(n_a)
    ));
    out.push_str(&format!(
        "Firmware: {}\n",
        report.firmware.as_deref().unwrap_or(n_a)
    ));
    out.push_str(&format!(
        "Health:   {}\n",
        report.health.as_deref().unwrap_or(n_a)
    ));
    if let Some(ref used) = report.percentage_used {
        out.push_str(&format!("Used:     {used}\n"));
    }

    if !report.attributes.is_empty() {
        out.push_str("\nSMART Attributes:\n");
        out.push_str(&format!(
            "{:>3}  {:<24} {:>5} {:>5} {:>6}  {}\n",
            "ID", "NAME", "VALUE", "WORST", "THRESH", "RAW"
        ));
        for attr in &report.attributes {
            if attr.is_fallback() {
                out.push_str(&format!("     {}\n", attr.raw));
                continue;
            }
            let id = attr
                .id
                .as_ref()
                .map(|id| match id {
                    smart_report_core::AttributeId::Number(n) => n.to_string(),
                    smart_report_core::AttributeId::Text(s) => s.clone(),
                })
                .unwrap_or_default();
            out.push_str(&format!(
                "{:>3}  {:<24} {:>5} {:>5} {:>6}  {}\n",
                id,
                attr.name.as_deref().unwrap_or(""),
                attr.value.as_deref().unwrap_or(""),
                attr.worst.as_deref().unwrap_or(""),
                attr.thresh.as_deref().unwrap_or(""),
                attr.raw,
            ));
        }
    }

    if !report.nvme_health.is_empty() {
        out.push_str("\nNVMe Health:\n");
        for (key, field) in &report.nvme_health {
            out.push_str(&format!("  {key}: {}", field.raw));
            if let Some(ref unit) = field.unit {
                if !field.raw.contains(unit.as_str()) {
                    out.push_str(&format!(" ({unit})"));
                }
            }
            out.push('\n');
        }
    }

    if !report.notes.is_empty() {
        out.push_str("\nNotes:\n");
        for note in &report.notes {
            out.push_str(&format!("  {note}\n"));
        }
    }

    out
}

fn scan_report_to_table(bundle: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Scanned at: {}\n", bundle.generated_at));
    if let Some(ref version) = bundle.tool_version {
        out.push_str(&format!("Tool:       {version}\n"));
    }
    for device in &bundle.devices {
        out.push_str(&format!("\nDevice: {}\n", device.device));
        out.push_str(&report_to_table(&device.report));
    }
    if !bundle.failures.is_empty() {
        out.push_str("\nFailures:\n");
        for failure in &bundle.failures {
            out.push_str(&format!("  {failure}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_report_core::{AtaAttribute, AttributeId};

    fn sample_report() -> DiskReport {
        DiskReport {
            model: Some("TestDisk 1TB".into()),
            serial: Some("ABCDEFG".into()),
            health: Some("PASSED".into()),
            attributes: vec![AtaAttribute {
                id: Some(AttributeId::Number(5)),
                name: Some("Reallocated_Sector_Ct".into()),
                value: Some("100".into()),
                worst: Some("100".into()),
                thresh: Some("036".into()),
                kind: Some("Pre-fail".into()),
                updated: Some("Always".into()),
                when_failed: Some("-".into()),
                raw: "0".into(),
            }],
            raw: "full dump".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_json_omits_raw_by_default() {
        let json = format_report(&sample_report(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("raw").is_none());
        assert_eq!(value["model"], "TestDisk 1TB");
    }

    #[test]
    fn test_json_includes_raw_on_request() {
        let json = format_report(&sample_report(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["raw"], "full dump");
    }

    #[test]
    fn test_table_shows_placeholders_and_attributes() {
        let table = format_report(&sample_report(), OutputFormat::Table, false).unwrap();
        assert!(table.contains("Model:    TestDisk 1TB"));
        assert!(table.contains("Firmware: n/a"));
        assert!(table.contains("Reallocated_Sector_Ct"));
    }

    #[test]
    fn test_device_list_formats() {
        let devices = vec!["/dev/sda".to_string(), "/dev/nvme0".to_string()];
        let plain = format_device_list(&devices, OutputFormat::Table).unwrap();
        assert_eq!(plain, "/dev/sda\n/dev/nvme0\n");

        let json = format_device_list(&devices, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["devices"][0], "/dev/sda");
    }
}
