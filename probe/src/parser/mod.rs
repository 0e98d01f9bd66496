//! Report parser for smartctl's human-readable output.
//!
//! This module implements a single-pass line classifier that turns the text
//! of a `smartctl -a` run into a [`DiskReport`]. It handles the two format
//! families smartctl emits:
//!
//! - **ATA/SATA** — header fields plus a fixed-column SMART attribute table
//!   (`ID# ATTRIBUTE_NAME FLAG VALUE WORST THRESH ...`).
//! - **NVMe** — header fields plus a `SMART/Health Information` key/value
//!   block with numeric values and units.
//!
//! # Architecture
//!
//! Each trimmed, non-empty line runs through an ordered chain of detectors:
//! header-field matching, NVMe section framing, and attribute-table framing.
//! The detectors are independent — a line can close one section and still be
//! inspected by the next detector — with two persistent flags
//! (`in_attr_table`, `in_nvme_window`) as the only parse state. Buffered NVMe
//! section lines are structured in a second pass by the [`metric`] extractor.
//!
//! The parser is total: it never fails, whatever the input. Unrecognized
//! content degrades to omitted fields, and malformed attribute rows are kept
//! as raw-only fallbacks. The full input is always retained in the report's
//! `raw` field.

pub mod metric;

use tracing::debug;

use smart_report_core::{AtaAttribute, AttributeId, DiskReport};

use metric::{extract_metric, normalize_metric_key};

const INFO_BANNER: &str = "=== START OF INFORMATION SECTION ===";
const DEVICE_MODEL: &str = "Device Model:";
const MODEL_NUMBER: &str = "Model Number:";
const SERIAL_NUMBER: &str = "Serial Number:";
const FIRMWARE_VERSION: &str = "Firmware Version:";
const HEALTH_RESULT: &str = "SMART overall-health self-assessment test result:";
const HEALTH_RESULT_PREFIX: &str = "SMART overall-health self-assessment test result";
const PERCENTAGE_USED: &str = "Percentage Used:";
const CRITICAL_WARNING: &str = "critical_warning";
const NVME_HEALTH_SECTION: &str = "SMART/Health Information";
const NVME_SECTION_ENDS: &[&str] = &["Error Information", "Self-test Log", "==="];
const ATTR_TABLE_MIN_TOKENS: usize = 10;

/// Line-classification state machine for one smartctl run.
///
/// Most consumers should use the crate-level
/// [`parse_smart_output`](crate::parse_smart_output) function instead.
pub struct ReportParser {
    output: String,
    report: DiskReport,
    in_attr_table: bool,
    in_nvme_window: bool,
    nvme_window: Vec<String>,
}

impl ReportParser {
    /// Creates a parser over the captured smartctl output.
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            report: DiskReport::default(),
            in_attr_table: false,
            in_nvme_window: false,
            nvme_window: Vec::new(),
        }
    }

    /// Runs the parse and returns the normalized report.
    ///
    /// Never fails; for unrecognizable input the report carries only the raw
    /// text.
    pub fn parse(mut self) -> DiskReport {
        let output = std::mem::take(&mut self.output);
        for raw_line in output.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(INFO_BANNER) {
                continue;
            }
            self.classify_line(line);
        }
        self.structure_nvme_window();
        self.report.raw = output;
        self.report
    }

    /// Runs every detector against one line, in order, without early exit
    /// beyond the explicit section-opener skips.
    fn classify_line(&mut self, line: &str) {
        self.match_header_field(line);
        if self.open_nvme_window(line) {
            return;
        }
        self.track_nvme_window(line);
        if self.open_attr_table(line) {
            return;
        }
        self.consume_attr_row(line);
    }

    /// Matches the fixed set of header label prefixes. Duplicate labels
    /// simply overwrite, so the last occurrence in line order wins.
    fn match_header_field(&mut self, line: &str) {
        if line.starts_with(DEVICE_MODEL) || line.starts_with(MODEL_NUMBER) {
            self.report.model = value_after_colon(line);
        } else if line.starts_with(SERIAL_NUMBER) {
            self.report.serial = value_after_colon(line);
        } else if line.starts_with(FIRMWARE_VERSION) {
            self.report.firmware = value_after_colon(line);
        } else if line.starts_with(HEALTH_RESULT) {
            self.report.health = value_after_colon(line);
        } else if line.starts_with(HEALTH_RESULT_PREFIX) {
            // Shares the label prefix but not the exact colon form; keep it
            // visible rather than dropping it.
            self.report.notes.push(line.to_string());
        } else if line.starts_with(PERCENTAGE_USED) {
            self.report.percentage_used = value_after_colon(line);
        } else if line.starts_with(CRITICAL_WARNING) {
            // First-pass entry; a windowed second-pass entry for the same key
            // overwrites it.
            if let Some(value) = value_after_colon(line) {
                self.report
                    .nvme_health
                    .insert(CRITICAL_WARNING.to_string(), extract_metric(&value));
            }
        }
    }

    /// Opens the NVMe health capture window. The opener line itself is
    /// consumed; a reopened window discards any earlier buffer.
    fn open_nvme_window(&mut self, line: &str) -> bool {
        if !line.starts_with(NVME_HEALTH_SECTION) {
            return false;
        }
        debug!("Entering NVMe health section");
        self.in_nvme_window = true;
        self.nvme_window.clear();
        true
    }

    /// Buffers lines inside the NVMe window, closing it on the next section
    /// marker. The closing line still flows to the attribute-table detector.
    fn track_nvme_window(&mut self, line: &str) {
        if !self.in_nvme_window {
            return;
        }
        if NVME_SECTION_ENDS.iter().any(|end| line.starts_with(end)) {
            debug!(lines = self.nvme_window.len(), "Leaving NVMe health section");
            self.in_nvme_window = false;
        } else {
            self.nvme_window.push(line.to_string());
        }
    }

    /// Detects the ATA attribute table header: an `ID#` column marker
    /// co-occurring with the attribute-name or flag column header. The header
    /// line is consumed, not stored.
    fn open_attr_table(&mut self, line: &str) -> bool {
        if !line.starts_with("ID#")
            || !(line.contains("ATTRIBUTE_NAME") || line.contains("FLAG"))
        {
            return false;
        }
        debug!("Entering ATA attribute table");
        self.in_attr_table = true;
        true
    }

    /// Consumes attribute-table rows. Rows start with a digit; the first line
    /// that does not closes the table (after the header detectors already saw
    /// it this iteration).
    fn consume_attr_row(&mut self, line: &str) {
        if !self.in_attr_table {
            return;
        }
        if !line.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.in_attr_table = false;
            return;
        }
        self.report.attributes.push(parse_attr_row(line));
    }

    /// Second pass: structures the buffered NVMe window lines into the
    /// health map. Lines without a colon are dropped; duplicate keys
    /// overwrite in line order.
    fn structure_nvme_window(&mut self) {
        for line in std::mem::take(&mut self.nvme_window) {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            self.report
                .nvme_health
                .insert(normalize_metric_key(label), extract_metric(value.trim()));
        }
    }
}

/// Returns the trimmed text after the first colon, when present and non-empty
/// as a label match requires.
fn value_after_colon(line: &str) -> Option<String> {
    line.split_once(':').map(|(_, value)| value.trim().to_string())
}

/// Tokenizes one attribute-table row per the fixed ATA column order. Rows
/// with fewer than ten tokens degrade to a raw-only fallback.
fn parse_attr_row(line: &str) -> AtaAttribute {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < ATTR_TABLE_MIN_TOKENS {
        return AtaAttribute::raw_only(line);
    }
    // Column order: ID, ATTRIBUTE_NAME, FLAG, VALUE, WORST, THRESH, TYPE,
    // UPDATED, WHEN_FAILED, RAW_VALUE. FLAG is discarded.
    AtaAttribute {
        id: Some(AttributeId::from_token(tokens[0])),
        name: Some(tokens[1].to_string()),
        value: Some(tokens[3].to_string()),
        worst: Some(tokens[4].to_string()),
        thresh: Some(tokens[5].to_string()),
        kind: Some(tokens[6].to_string()),
        updated: Some(tokens[7].to_string()),
        when_failed: Some(tokens[8].to_string()),
        raw: tokens[9..].join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_report_core::MetricValue;

    fn parse(text: &str) -> DiskReport {
        ReportParser::new(text).parse()
    }

    #[test]
    fn test_empty_input_yields_raw_only_report() {
        let report = parse("");
        assert!(report.is_empty());
        assert_eq!(report.raw, "");
    }

    #[test]
    fn test_garbage_input_never_fails() {
        let garbage = "\u{0}\u{1}\x7f not smartctl\n\n:::\n123";
        let report = parse(garbage);
        assert_eq!(report.raw, garbage);
        assert!(report.attributes.is_empty());
        assert!(report.nvme_health.is_empty());
    }

    #[test]
    fn test_header_fields_extracted() {
        let report = parse(
            "=== START OF INFORMATION SECTION ===\n\
             Device Model:     TestDisk 1TB\n\
             Serial Number:    ABCDEFG\n\
             Firmware Version: 1.23\n\
             SMART overall-health self-assessment test result: PASSED\n",
        );
        assert_eq!(report.model.as_deref(), Some("TestDisk 1TB"));
        assert_eq!(report.serial.as_deref(), Some("ABCDEFG"));
        assert_eq!(report.firmware.as_deref(), Some("1.23"));
        assert_eq!(report.health.as_deref(), Some("PASSED"));
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_duplicate_serial_last_wins() {
        let text = "Serial Number: FIRST\nSerial Number: SECOND\n";
        let report = parse(text);
        assert_eq!(report.serial.as_deref(), Some("SECOND"));
        // Deterministic across repeated runs of the same input.
        assert_eq!(parse(text), report);
    }

    #[test]
    fn test_near_miss_health_line_lands_in_notes() {
        let report =
            parse("SMART overall-health self-assessment test result was not available\n");
        assert!(report.health.is_none());
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].contains("not available"));
    }

    #[test]
    fn test_attr_table_rows_parsed() {
        let report = parse(
            "ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE\n\
             1 Raw_Read_Error_Rate     0x000f   200   200   051    Pre-fail  Always       -       0\n\
             5 Reallocated_Sector_Ct   0x0033   100   100   036    Pre-fail  Always       -       0\n",
        );
        assert_eq!(report.attributes.len(), 2);
        let attr = report.attribute("Raw_Read_Error_Rate").unwrap();
        assert_eq!(attr.id, Some(AttributeId::Number(1)));
        assert_eq!(attr.value.as_deref(), Some("200"));
        assert_eq!(attr.thresh.as_deref(), Some("051"));
        assert_eq!(attr.kind.as_deref(), Some("Pre-fail"));
        assert_eq!(attr.raw, "0");
    }

    #[test]
    fn test_attr_table_closes_on_non_digit_line() {
        let report = parse(
            "ID# ATTRIBUTE_NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE\n\
             9 Power_On_Hours 0x0032 099 099 000 Old_age Always - 1234\n\
             SMART Error Log Version: 1\n\
             5 Reallocated_Sector_Ct 0x0033 100 100 036 Pre-fail Always - 0\n",
        );
        // The non-digit line ends the table; the later digit-initial line is
        // not a table row anymore.
        assert_eq!(report.attributes.len(), 1);
        assert_eq!(
            report.attributes[0].name.as_deref(),
            Some("Power_On_Hours")
        );
    }

    #[test]
    fn test_malformed_attr_row_kept_as_raw_fallback() {
        let report = parse(
            "ID# ATTRIBUTE_NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE\n\
             5 Reallocated_Sector_Ct 100\n",
        );
        assert_eq!(report.attributes.len(), 1);
        let row = &report.attributes[0];
        assert!(row.is_fallback());
        assert_eq!(row.raw, "5 Reallocated_Sector_Ct 100");
    }

    #[test]
    fn test_attr_row_raw_value_joins_trailing_tokens() {
        let report = parse(
            "ID# ATTRIBUTE_NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE\n\
             194 Temperature_Celsius 0x0022 064 052 000 Old_age Always - 36 (Min/Max 21/48)\n",
        );
        let attr = report.attribute("Temperature_Celsius").unwrap();
        assert_eq!(attr.raw, "36 (Min/Max 21/48)");
    }

    #[test]
    fn test_nvme_window_buffered_and_structured() {
        let report = parse(
            "SMART/Health Information (NVMe Log 0x02)\n\
             Critical Warning:           0x00\n\
             Temperature:                29 Celsius\n\
             Power On Hours:             41\n\
             Data Units Read:            1,778,273 [910 GB]\n\
             Error Information (NVMe Log 0x01, 16 of 64 entries)\n\
             No Errors Logged\n",
        );
        assert_eq!(
            report.metric("temperature").unwrap().value,
            MetricValue::Integer(29)
        );
        assert_eq!(
            report.metric("power_on_hours").unwrap().value,
            MetricValue::Integer(41)
        );
        let read = report.metric("data_units_read").unwrap();
        assert_eq!(read.value, MetricValue::Integer(1_778_273));
        assert_eq!(read.unit.as_deref(), Some("910 GB"));
        // The closing line and everything after it stay out of the map.
        assert!(report.metric("no_errors_logged").is_none());
        assert!(!report.nvme_health.contains_key("error_information"));
    }

    #[test]
    fn test_nvme_window_closed_by_divider() {
        let report = parse(
            "SMART/Health Information (NVMe Log 0x02)\n\
             Temperature: 29 Celsius\n\
             === START OF SMART DATA SECTION ===\n\
             Available Spare: 100%\n",
        );
        assert!(report.metric("temperature").is_some());
        assert!(report.metric("available_spare").is_none());
    }

    #[test]
    fn test_critical_warning_merged_from_first_pass() {
        let report = parse("critical_warning : 0x00\n");
        let field = report.metric("critical_warning").unwrap();
        assert_eq!(field.raw, "0x00");
    }

    #[test]
    fn test_windowed_critical_warning_overwrites_first_pass() {
        let report = parse(
            "critical_warning : 0\n\
             SMART/Health Information (NVMe Log 0x02)\n\
             Critical Warning: 0x00\n\
             Self-test Log (NVMe Log 0x06)\n",
        );
        assert_eq!(report.metric("critical_warning").unwrap().raw, "0x00");
    }

    #[test]
    fn test_nvme_line_without_colon_dropped() {
        let report = parse(
            "SMART/Health Information (NVMe Log 0x02)\n\
             Temperature Sensors Unsupported\n\
             Temperature: 29 Celsius\n",
        );
        assert_eq!(report.nvme_health.len(), 1);
        assert!(report.metric("temperature").is_some());
    }

    #[test]
    fn test_raw_always_carries_full_input() {
        let text = "Device Model: X\nleftover noise\n";
        let report = parse(text);
        assert_eq!(report.raw, text);
    }
}
