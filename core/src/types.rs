//! Type definitions for normalized disk health reports.
//!
//! This module defines the data model produced by the report parser in the
//! `smart-report-probe` crate. The types are designed for serialization with
//! [`serde`] and round-trip cleanly through JSON and YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-effort numeric interpretation of a metric value.
///
/// smartctl reports values as free text (`29 Celsius`, `1,778,273 [910 GB]`,
/// `0x0033`), so a metric value may decode to an integer, a decimal, or stay
/// a string when no leading number is present. Serializes untagged, so JSON
/// output carries a plain number or string.
///
/// # Examples
///
/// ```
/// use smart_report_core::MetricValue;
///
/// let v = MetricValue::Integer(29);
/// assert_eq!(v.as_integer(), Some(29));
/// assert_eq!(MetricValue::Text("n/a".into()).as_integer(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Whole number, thousands separators already stripped.
    Integer(i64),
    /// Decimal fallback for numbers that do not fit an integer.
    Decimal(f64),
    /// Original string when no numeric interpretation applies.
    Text(String),
}

impl MetricValue {
    /// Returns the integer value, if this is an [`Integer`](Self::Integer).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the textual value, if this is a [`Text`](Self::Text).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One normalized NVMe health-log entry.
///
/// The `raw` string is always the untouched value portion of the source line;
/// `value` and `unit` are the extracted interpretation. Extraction failure is
/// never silent: when no number can be pulled out, `value` falls back to the
/// raw string.
///
/// # Examples
///
/// ```
/// use smart_report_core::{MetricField, MetricValue};
///
/// let field = MetricField {
///     raw: "29 Celsius".into(),
///     value: MetricValue::Integer(29),
///     unit: Some("Celsius".into()),
/// };
/// assert_eq!(field.value.as_integer(), Some(29));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricField {
    /// Untouched trimmed value portion of the source line.
    pub raw: String,
    /// Extracted numeric value, or the raw string when extraction fails.
    pub value: MetricValue,
    /// Bracketed annotation or short trailing token after the number.
    pub unit: Option<String>,
}

/// Identifier of an ATA SMART attribute row.
///
/// Normally the numeric ID from the first table column; kept as the raw token
/// when it does not parse as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeId {
    Number(i64),
    Text(String),
}

impl AttributeId {
    /// Parses a table token, keeping it verbatim when not numeric.
    pub fn from_token(token: &str) -> Self {
        token
            .parse::<i64>()
            .map_or_else(|_| Self::Text(token.to_string()), Self::Number)
    }
}

/// One row of an ATA SMART attribute table.
///
/// Column values are kept as raw string tokens — `value`, `worst`, and
/// `thresh` are never converted to numbers, preserving hex-like and
/// zero-padded source formatting. A malformed row (fewer than ten whitespace
/// tokens) is represented with only `raw` populated.
///
/// # Examples
///
/// ```
/// use smart_report_core::AtaAttribute;
///
/// let row = AtaAttribute::raw_only("5 Reallocated_Sector_Ct");
/// assert!(row.id.is_none());
/// assert_eq!(row.raw, "5 Reallocated_Sector_Ct");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtaAttribute {
    /// Numeric attribute ID, or the raw token if not numeric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AttributeId>,
    /// Attribute name token (e.g. `Reallocated_Sector_Ct`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Normalized current value, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Worst recorded value, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worst: Option<String>,
    /// Failure threshold, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresh: Option<String>,
    /// Attribute type column (`Pre-fail` / `Old_age`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Update condition column (`Always` / `Offline`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// When-failed column (usually `-`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_failed: Option<String>,
    /// Raw value column; for malformed rows, the entire source line.
    pub raw: String,
}

impl AtaAttribute {
    /// Creates a fallback row carrying only the raw source line.
    pub fn raw_only(line: &str) -> Self {
        Self {
            raw: line.to_string(),
            ..Default::default()
        }
    }

    /// Returns `true` when this row is a raw-only fallback.
    pub fn is_fallback(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

/// Normalized report for a single device.
///
/// This is the primary type in the crate: the output of parsing one smartctl
/// run. A report may carry an ATA attribute table, an NVMe health map, both,
/// or neither — `raw` is the sole field guaranteed to be populated in memory.
///
/// `raw` is excluded from serialized output by default; callers that want the
/// full dump serialize the report as-is, everyone else goes through
/// [`without_raw`](Self::without_raw) first.
///
/// # Examples
///
/// ```
/// use smart_report_core::DiskReport;
///
/// let mut report = DiskReport::default();
/// report.model = Some("TestDisk 1TB".into());
/// report.raw = "...full smartctl output...".into();
///
/// let clean = report.without_raw();
/// assert!(clean.raw.is_empty());
/// assert_eq!(clean.model.as_deref(), Some("TestDisk 1TB"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskReport {
    /// Device model / identification string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Device serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Firmware version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    /// Overall health self-assessment, verbatim (`PASSED` / `FAILED!`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    /// NVMe wear indicator, kept as the raw string (e.g. `0%`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_used: Option<String>,
    /// Near-miss lines that matched a label prefix but not its exact form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// ATA SMART attribute rows, present when an attribute table was found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AtaAttribute>,
    /// NVMe health entries keyed by normalized label; last write wins.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nvme_health: BTreeMap<String, MetricField>,
    /// Full original smartctl output, kept for audit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw: String,
}

impl DiskReport {
    /// Returns a copy with the raw dump cleared, for default serialization.
    pub fn without_raw(&self) -> Self {
        Self {
            raw: String::new(),
            ..self.clone()
        }
    }

    /// Finds an attribute row by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use smart_report_core::{AtaAttribute, DiskReport};
    ///
    /// let mut report = DiskReport::default();
    /// report.attributes.push(AtaAttribute {
    ///     name: Some("Power_On_Hours".into()),
    ///     ..AtaAttribute::raw_only("9 Power_On_Hours ...")
    /// });
    ///
    /// assert!(report.attribute("Power_On_Hours").is_some());
    /// assert!(report.attribute("Spin_Up_Time").is_none());
    /// ```
    pub fn attribute(&self, name: &str) -> Option<&AtaAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.name.as_deref() == Some(name))
    }

    /// Finds an NVMe health entry by normalized key.
    pub fn metric(&self, key: &str) -> Option<&MetricField> {
        self.nvme_health.get(key)
    }

    /// Returns `true` when nothing beyond the raw text was recognized.
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.serial.is_none()
            && self.firmware.is_none()
            && self.health.is_none()
            && self.percentage_used.is_none()
            && self.notes.is_empty()
            && self.attributes.is_empty()
            && self.nvme_health.is_empty()
    }
}
