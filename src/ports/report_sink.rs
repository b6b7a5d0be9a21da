//! Report sink port: Trait for printable report output.

use std::path::PathBuf;

use crate::domain::PatientReport;

/// Destination for rendered patient reports.
pub trait ReportSink: Send + Sync {
    /// Error type for output failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Render and write a report.
    ///
    /// # Returns
    /// Location of the written document.
    ///
    /// # Errors
    /// Returns error if the report cannot be written.
    fn write_report(&self, report: &PatientReport) -> Result<PathBuf, Self::Error>;
}
