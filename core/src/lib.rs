//! Core types for normalized SMART disk reports.
//!
//! This crate defines the data model shared between the probe library and the
//! CLI:
//!
//! - [`DiskReport`] — normalized report for one device (identity, health,
//!   attribute table, NVMe health map).
//! - [`AtaAttribute`] — one row of an ATA SMART attribute table.
//! - [`MetricField`] — one NVMe health entry with numeric/unit extraction.
//! - [`MetricValue`] — integer, decimal, or text metric value.
//!
//! # Example
//!
//! ```
//! use smart_report_core::{DiskReport, MetricField, MetricValue};
//!
//! let mut report = DiskReport::default();
//! report.model = Some("UMIS RPJYJ1T24RLS1QWY".into());
//! report.nvme_health.insert(
//!     "temperature".into(),
//!     MetricField {
//!         raw: "29 Celsius".into(),
//!         value: MetricValue::Integer(29),
//!         unit: Some("Celsius".into()),
//!     },
//! );
//!
//! assert_eq!(report.metric("temperature").unwrap().value.as_integer(), Some(29));
//! ```

mod types;

pub use types::*;
