//! Report service: build and write printable reports.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::PatientReport;
use crate::ports::ReportSink;
use crate::SehatError;

use super::Assessment;

/// Service for producing printable patient reports.
pub struct ReportService<W>
where
    W: ReportSink,
{
    sink: Arc<W>,
}

impl<W> ReportService<W>
where
    W: ReportSink,
    W::Error: Into<SehatError>,
{
    pub fn new(sink: Arc<W>) -> Self {
        Self { sink }
    }

    /// Build a report from an assessment. Nothing is written.
    #[must_use]
    pub fn build(&self, assessment: &Assessment, notes: &str) -> PatientReport {
        PatientReport::with_risk(assessment.record.clone(), assessment.risk.clone(), notes)
    }

    /// Build and write a report.
    ///
    /// # Errors
    /// Returns error if the sink cannot write the document.
    pub fn generate(&self, assessment: &Assessment, notes: &str) -> Result<PathBuf, SehatError> {
        let report = self.build(assessment, notes);
        let path = self
            .sink
            .write_report(&report)
            .map_err(Into::<SehatError>::into)?;
        tracing::info!("Report ready at {}", path.display());
        Ok(path)
    }
}
