//! JSON file adapter: Implementation of `DatasetSource`.
//!
//! The document is a single object mapping identifier to record:
//!
//! ```json
//! {
//!   "35202-1234567-1": {
//!     "name": "Ayesha Khan", "nic": "35202-1234567-1", "dob": "1990-04-12",
//!     "age": 35, "gender": "Female", "contact": "0300-1234567",
//!     "medical_history": "Hypertension"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Dataset, PatientRecord};
use crate::ports::DatasetSource;

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Cannot read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Dataset stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileDataset {
    path: PathBuf,
}

impl JsonFileDataset {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse a dataset document.
///
/// # Errors
/// Returns `DatasetError::Parse` if the text is not an identifier → record object.
pub fn parse_dataset(json: &str) -> Result<Dataset, DatasetError> {
    let records: HashMap<String, PatientRecord> = serde_json::from_str(json)?;

    let mismatched = records.iter().filter(|(key, r)| key.as_str() != r.nic).count();
    if mismatched > 0 {
        // Keys are authoritative for lookup; the record field is display only.
        tracing::warn!("{} dataset entries have a key that differs from their nic field", mismatched);
    }

    Ok(Dataset::from_map(records))
}

impl DatasetSource for JsonFileDataset {
    type Error = DatasetError;

    fn load(&self) -> Result<Dataset, DatasetError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| DatasetError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dataset = parse_dataset(&text)?;
        tracing::info!("Loaded {} patient records", dataset.len());
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
