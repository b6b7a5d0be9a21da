//! Application layer: Use cases and services.
//!
//! Orchestrates domain logic with ports: looking a patient up, scanning a
//! QR image and producing a printable report.

mod patient;
mod report;
mod scan;

pub use patient::{Assessment, DatasetStatus, PatientService};
pub use report::ReportService;
pub use scan::{ScanOutcome, ScanService, ScanStage};
