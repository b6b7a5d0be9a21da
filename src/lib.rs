//! # SehatAI
//!
//! Clinic demo: look a patient up by national ID (typed or scanned from a
//! QR image), compute a mock rule-based risk score and print a report.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientRecord, Dataset, risk evaluator, report)
//! - `ports`: Trait definitions for external collaborators
//! - `adapters`: Concrete implementations (JSON file, rqrr, HTML writer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{evaluate, Dataset, LookupError, PatientRecord, RiskLabel, RiskResult};

/// Result type for SehatAI operations
pub type Result<T> = std::result::Result<T, SehatError>;

/// Main error type for SehatAI
#[derive(Debug, thiserror::Error)]
pub enum SehatError {
    #[error(transparent)]
    Lookup(#[from] domain::LookupError),

    #[error("Dataset load failed: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Image error: {0}")]
    Image(#[from] adapters::ImageLoadError),

    #[error("Report error: {0}")]
    Report(#[from] adapters::ReportError),
}
