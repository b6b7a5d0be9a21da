//! Read-only patient dataset and identifier lookup.

use std::collections::HashMap;

use super::PatientRecord;

/// Errors surfaced by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The identifier was empty or whitespace only.
    #[error("Enter a NIC or upload QR image first.")]
    EmptyIdentifier,

    /// No record is keyed by this identifier.
    #[error("Patient not found in demo dataset: {0}")]
    NotFound(String),
}

/// Patient records keyed by identifier.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: HashMap<String, PatientRecord>,
}

impl Dataset {
    /// An empty dataset (used when loading fails).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from an identifier → record map.
    #[must_use]
    pub fn from_map(records: HashMap<String, PatientRecord>) -> Self {
        Self { records }
    }

    /// Build a dataset keyed by each record's own `nic`.
    ///
    /// Later records replace earlier ones with the same identifier.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = PatientRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.nic.clone(), r)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers in sorted order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Exact-match lookup of an already-normalized identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&PatientRecord> {
        self.records.get(identifier)
    }

    /// Look up a record by a raw identifier.
    ///
    /// The identifier is trimmed; an empty result is rejected before the
    /// dataset is consulted.
    ///
    /// # Errors
    /// `EmptyIdentifier` for blank input, `NotFound` when no key matches.
    pub fn lookup(&self, identifier: &str) -> Result<&PatientRecord, LookupError> {
        let id = normalize_identifier(identifier)?;
        self.get(id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }
}

/// Trim an identifier, rejecting blank input.
///
/// # Errors
/// Returns `EmptyIdentifier` if nothing is left after trimming.
pub fn normalize_identifier(raw: &str) -> Result<&str, LookupError> {
    match raw.trim() {
        "" => Err(LookupError::EmptyIdentifier),
        id => Ok(id),
    }
}
