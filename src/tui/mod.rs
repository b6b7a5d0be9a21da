//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Patient lookup by CNIC, with a notes field for the report
//! - QR image scan
//! - Patient panel with the risk score and report printing

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, FileScanService, Screen};
pub use styles::ClinicTheme;
pub use worker::{ScanProgress, ScanWorker, ScanWorkerHandle, WORKER_STOPPED};
