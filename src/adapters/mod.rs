//! Adapters layer: Concrete implementations of ports.
//!
//! - `json_dataset`: patient dataset from a JSON file
//! - `qr`: image loading (`image`) and QR decoding (`rqrr`)
//! - `report`: HTML report writer and text summaries
//! - `sanitize`: PII filtering for logs

pub mod json_dataset;
pub mod qr;
pub mod report;
pub mod sanitize;

pub use json_dataset::{DatasetError, JsonFileDataset};
pub use qr::{ImageFileReader, ImageLoadError, RqrrDecoder};
pub use report::{HtmlReportWriter, ReportError};
