//! Numeric/unit extraction for NVMe health values.
//!
//! smartctl's NVMe health log reports values like `29 Celsius`, `0%`, or
//! `1,778,273 [910 GB]`. Extraction is a two-tier policy: values carrying a
//! bracketed annotation treat the bracket content as the unit and search the
//! whole string for the primary number, while plain values match an anchored
//! number-plus-unit pattern at the start. Either way the original string is
//! preserved, and a value that yields no number stays text.

use regex::Regex;
use std::sync::LazyLock;

use smart_report_core::{MetricField, MetricValue};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("static regex must compile"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+[\d,]*").expect("static regex must compile"));
static ANCHORED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?\d+[\d,]*)(?:\s*(\w+%?|Celsius|KB|MB|GB|TB))?")
        .expect("static regex must compile")
});

/// Normalizes an NVMe health label into a map key: trimmed, lowercased,
/// internal spaces replaced with underscores.
///
/// `Data Units Read` becomes `data_units_read`.
pub fn normalize_metric_key(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Extracts a [`MetricField`] from the trimmed value portion of a health line.
///
/// Bracketed values (`1,778,273 [910 GB]`) report a derived quantity in the
/// bracket; the bracket content becomes the unit and the first number found
/// anywhere in the value is the primary quantity. Unbracketed values are
/// matched at the start for a number and an optional short unit token.
pub fn extract_metric(raw: &str) -> MetricField {
    if let Some(bracket) = BRACKET_RE.captures(raw) {
        let value = NUMBER_RE
            .find(raw)
            .map(|m| numeric_value(m.as_str(), raw))
            .unwrap_or_else(|| MetricValue::Text(raw.to_string()));
        return MetricField {
            raw: raw.to_string(),
            value,
            unit: Some(bracket[1].to_string()),
        };
    }

    if let Some(caps) = ANCHORED_RE.captures(raw) {
        return MetricField {
            raw: raw.to_string(),
            value: numeric_value(&caps[1], raw),
            unit: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }

    MetricField {
        raw: raw.to_string(),
        value: MetricValue::Text(raw.to_string()),
        unit: None,
    }
}

/// Parses a digit run into an integer, falling back to decimal, falling back
/// to the original string. Thousands-separator commas are stripped first.
fn numeric_value(digits: &str, original: &str) -> MetricValue {
    let stripped = digits.replace(',', "");
    if let Ok(n) = stripped.parse::<i64>() {
        return MetricValue::Integer(n);
    }
    if let Ok(d) = stripped.parse::<f64>() {
        return MetricValue::Decimal(d);
    }
    MetricValue::Text(original.to_string())
}
