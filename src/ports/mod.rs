//! Ports layer: Trait definitions for external operations.
//!
//! These traits define the boundaries between the application and the
//! outside world: where the dataset comes from, how images are read, who
//! decodes QR codes and where printable reports go.

mod dataset_source;
mod frame_source;
mod qr_decoder;
mod report_sink;

pub use dataset_source::DatasetSource;
pub use frame_source::FrameSource;
pub use qr_decoder::{FrameError, QrDecoder, RgbaFrame};
pub use report_sink::ReportSink;
