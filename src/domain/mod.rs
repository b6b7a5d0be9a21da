//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the patient record, the read-only dataset with
//! identifier lookup, the rule-based risk evaluator and the report model.

mod dataset;
mod patient;
mod report;
mod risk;

pub use dataset::{normalize_identifier, Dataset, LookupError};
pub use patient::PatientRecord;
pub use report::PatientReport;
pub use risk::{
    age_addend, clamp_score, evaluate, history_addend, raw_score, RiskLabel, RiskResult,
    BASE_SCORE, MAX_SCORE,
};
