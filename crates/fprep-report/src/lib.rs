//! # fprep-report: Presentation Layer
//!
//! Formats what the engine produced. Nothing here feeds back into a phase.

pub mod export;
pub mod metrics;
pub mod tables;

pub use export::{export_preprocessed, export_results, report_dir, ReportPaths};
pub use metrics::{Metric, MetricLog, PhaseTimer};
