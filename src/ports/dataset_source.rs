//! Dataset source port: where patient records come from.

use crate::domain::Dataset;

/// Loads the patient dataset once at startup.
pub trait DatasetSource: Send + Sync {
    /// Error type for load failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full dataset.
    ///
    /// # Errors
    /// Returns error if the source is unreachable or malformed.
    fn load(&self) -> Result<Dataset, Self::Error>;

    /// Human-readable description of the source (path, URL).
    fn describe(&self) -> String;
}
