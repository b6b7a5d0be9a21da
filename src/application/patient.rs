//! Patient service: dataset loading, lookup and risk assessment.

use std::sync::Arc;

use crate::domain::{evaluate, Dataset, LookupError, PatientRecord, RiskResult};
use crate::ports::DatasetSource;

/// A looked-up record together with its evaluated risk.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub record: PatientRecord,
    pub risk: RiskResult,
}

impl Assessment {
    #[must_use]
    pub fn of(record: &PatientRecord) -> Self {
        Self {
            record: record.clone(),
            risk: evaluate(record),
        }
    }
}

/// Outcome of the one-time dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    Loaded { records: usize, source: String },
    /// Loading failed; the session runs with an empty dataset.
    Failed { source: String, reason: String },
}

impl DatasetStatus {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Read-only lookups against a dataset loaded once at startup.
#[derive(Debug, Clone)]
pub struct PatientService {
    dataset: Arc<Dataset>,
    status: DatasetStatus,
}

impl PatientService {
    /// Wrap an already loaded dataset.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let status = DatasetStatus::Loaded {
            records: dataset.len(),
            source: "in-memory".to_string(),
        };
        Self { dataset, status }
    }

    /// Load the dataset from `source`.
    ///
    /// A failed load is logged and the service continues with an empty
    /// dataset; the failure is kept in [`PatientService::status`].
    pub fn load<D: DatasetSource>(source: &D) -> Self {
        let description = source.describe();
        match source.load() {
            Ok(dataset) => Self {
                status: DatasetStatus::Loaded {
                    records: dataset.len(),
                    source: description,
                },
                dataset: Arc::new(dataset),
            },
            Err(e) => {
                tracing::error!("patients dataset load failed: {}", e);
                Self {
                    status: DatasetStatus::Failed {
                        source: description,
                        reason: e.to_string(),
                    },
                    dataset: Arc::new(Dataset::empty()),
                }
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> &DatasetStatus {
        &self.status
    }

    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Look up a record and evaluate it.
    ///
    /// # Errors
    /// `EmptyIdentifier` for blank input, `NotFound` for unknown identifiers.
    pub fn assess(&self, identifier: &str) -> Result<Assessment, LookupError> {
        let record = self.dataset.lookup(identifier)?;
        let assessment = Assessment::of(record);
        tracing::debug!(
            "Assessed record: score={}, label={}",
            assessment.risk.score,
            assessment.risk.label
        );
        Ok(assessment)
    }
}
