//! Headless patient assessment.
//!
//! Looks a patient up by CNIC (or by decoding a QR image), prints the record
//! with its risk score and optionally writes the printable HTML report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sehatai-assess -- (--nic <id> | --qr <image>) [--dataset <path>] \
//!     [--notes <text>] [--report] [--report-dir <dir>]
//! ```
//!
//! Exit codes: 0 success, 1 patient not found or no QR code, 2 usage error,
//! 3 unreadable input or report failure.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sehatai::adapters::report::render_text;
use sehatai::adapters::sanitize::SanitizingMakeWriter;
use sehatai::adapters::{HtmlReportWriter, ImageFileReader, JsonFileDataset, RqrrDecoder};
use sehatai::application::{PatientService, ReportService, ScanOutcome, ScanService};
use sehatai::ports::ReportSink;
use sehatai::{AppConfig, SehatError};

const USAGE: &str = "Usage: sehatai-assess (--nic <id> | --qr <image>) [--dataset <path>] [--notes <text>] [--report] [--report-dir <dir>]";

const HELP: &str = "Prints the patient record and rule-based risk score. --report writes a printable HTML report into --report-dir (default: $SEHATAI_REPORT_DIR or ./reports); --report-dir implies --report.";

/// Where the identifier comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Nic(String),
    Qr(PathBuf),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    source: Source,
    dataset: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    notes: String,
    write_report: bool,
}

impl Options {
    /// Overlay command-line paths on the environment configuration.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Assess(Options),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum UsageError {
    #[error("Missing --nic or --qr")]
    MissingSource,

    #[error("{0} needs a value")]
    MissingValue(String),

    #[error("Unknown arg: {0}")]
    UnknownArg(String),
}

/// Why an assessment did not complete.
#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error("No QR found in image (or poor quality).")]
    NoCode,

    #[error(transparent)]
    Sehat(#[from] SehatError),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::NoCode | Self::Sehat(SehatError::Lookup(_)) => 1,
            Self::Sehat(_) => 3,
        }
    }
}

/// A completed assessment, ready to print.
#[derive(Debug)]
struct Assessed {
    /// "QR decoded: ..." when the identifier came from an image
    scan_message: Option<String>,
    summary: String,
    report_path: Option<PathBuf>,
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, UsageError> {
    args.next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UsageError::MissingValue(flag.to_string()))
}

fn parse_args<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut source = None;
    let mut dataset = None;
    let mut report_dir = None;
    let mut notes = String::new();
    let mut write_report = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--nic" => source = Some(Source::Nic(value_for(&arg, &mut args)?)),
            "--qr" => source = Some(Source::Qr(PathBuf::from(value_for(&arg, &mut args)?))),
            "--dataset" => dataset = Some(PathBuf::from(value_for(&arg, &mut args)?)),
            "--notes" => notes = value_for(&arg, &mut args)?,
            "--report" => write_report = true,
            "--report-dir" => {
                report_dir = Some(PathBuf::from(value_for(&arg, &mut args)?));
                write_report = true;
            }
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(UsageError::UnknownArg(arg)),
        }
    }

    let source = source.ok_or(UsageError::MissingSource)?;
    Ok(Command::Assess(Options {
        source,
        dataset,
        report_dir,
        notes,
        write_report,
    }))
}

fn assess(options: &Options, config: &AppConfig) -> Result<Assessed, Failure> {
    let patients = PatientService::load(&JsonFileDataset::new(&config.dataset_path));

    let (identifier, scan_message) = match &options.source {
        Source::Nic(nic) => (nic.clone(), None),
        Source::Qr(path) => {
            let scanner = ScanService::new(Arc::new(ImageFileReader), Arc::new(RqrrDecoder::new()));
            let outcome = scanner.scan_file(path)?;
            let message = outcome.message();
            match outcome {
                ScanOutcome::Decoded(payload) => (payload, Some(message)),
                ScanOutcome::NoCode => return Err(Failure::NoCode),
            }
        }
    };

    let assessment = patients.assess(&identifier).map_err(SehatError::from)?;

    let writer = Arc::new(HtmlReportWriter::new(&config.report_dir));
    let report = ReportService::new(Arc::clone(&writer)).build(&assessment, &options.notes);

    let report_path = if options.write_report {
        Some(writer.write_report(&report).map_err(SehatError::from)?)
    } else {
        None
    };

    Ok(Assessed {
        scan_message,
        summary: render_text(&report),
        report_path,
    })
}

fn fail(failure: &Failure) -> ! {
    eprintln!("{failure}");
    if matches!(failure, Failure::Usage(_)) {
        eprintln!("{USAGE}");
    }
    std::process::exit(failure.exit_code());
}

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Assess(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}\n\n{HELP}");
            return;
        }
        Err(e) => fail(&Failure::from(e)),
    };

    // Diagnostics go to stderr so stdout carries only the summary.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(std::io::stderr)))
        .init();

    let config = options.apply(AppConfig::from_env());
    match assess(&options, &config) {
        Ok(assessed) => {
            if let Some(message) = &assessed.scan_message {
                eprintln!("{message}");
            }
            print!("{}", assessed.summary);
            if let Some(path) = &assessed.report_path {
                println!("\nReport written to {}", path.display());
            }
        }
        Err(failure) => fail(&failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const DATASET: &str = r#"{
        "35202-1234567-1": {
            "name": "Ayesha Khan", "nic": "35202-1234567-1", "dob": "1980-02-02",
            "age": 45, "gender": "Female", "contact": "0300-1234567",
            "medical_history": "Hypertension"
        }
    }"#;

    fn args(line: &[&str]) -> Vec<String> {
        line.iter().map(|a| (*a).to_string()).collect()
    }

    fn options(line: &[&str]) -> Options {
        match parse_args(args(line)).expect("Should parse") {
            Command::Assess(options) => options,
            Command::Help => panic!("unexpected help"),
        }
    }

    fn config(dir: &Path) -> AppConfig {
        let dataset_path = dir.join("patients.json");
        std::fs::write(&dataset_path, DATASET).expect("Should write dataset");
        AppConfig {
            dataset_path,
            report_dir: dir.join("reports"),
            ..AppConfig::default()
        }
    }

    fn exit_code(result: Result<Assessed, Failure>) -> i32 {
        result.map_or_else(|f| f.exit_code(), |_| 0)
    }

    #[test]
    fn test_parse_nic_and_notes() {
        let opts = options(&["--nic", "35202-1234567-1", "--notes", "BP 150/95"]);
        assert_eq!(opts.source, Source::Nic("35202-1234567-1".to_string()));
        assert_eq!(opts.notes, "BP 150/95");
        assert!(!opts.write_report);
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
    }

    #[test]
    fn test_usage_errors_exit_2() {
        let cases: [(&[&str], UsageError); 4] = [
            (&[], UsageError::MissingSource),
            (&["--report"], UsageError::MissingSource),
            (&["--nic", "1", "--verbose"], UsageError::UnknownArg("--verbose".to_string())),
            (&["--nic"], UsageError::MissingValue("--nic".to_string())),
        ];
        for (line, expected) in cases {
            let err = parse_args(args(line)).expect_err("Should reject");
            assert_eq!(err, expected, "{line:?}");
            assert_eq!(Failure::from(err).exit_code(), 2);
        }

        assert_eq!(
            parse_args(args(&["--qr", ""])),
            Err(UsageError::MissingValue("--qr".to_string()))
        );
    }

    #[test]
    fn test_report_dir_implies_report() {
        let opts = options(&["--qr", "card.png", "--report-dir", "/tmp/out"]);
        assert!(opts.write_report);
        assert_eq!(opts.report_dir, Some(PathBuf::from("/tmp/out")));

        let config = opts.apply(AppConfig::default());
        assert_eq!(config.report_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.dataset_path, AppConfig::default().dataset_path);
    }

    #[test]
    fn test_assess_found_exit_0() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = config(dir.path());

        let assessed = assess(&options(&["--nic", " 35202-1234567-1 "]), &config)
            .expect("Should assess");
        assert!(assessed.summary.contains("Risk Score:      50% — Attention"));
        assert!(assessed.report_path.is_none());
        assert!(assessed.scan_message.is_none());
        assert!(!config.report_dir.exists());
    }

    #[test]
    fn test_assess_writes_report() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = config(dir.path());
        let report_dir = dir.path().join("printed");

        let opts = options(&[
            "--nic",
            "35202-1234567-1",
            "--report-dir",
            report_dir.to_str().expect("utf8 path"),
        ]);
        let assessed = assess(&opts, &opts.apply(config)).expect("Should assess");

        let path = assessed.report_path.expect("Should write report");
        assert!(path.starts_with(&report_dir));
        let html = std::fs::read_to_string(path).expect("Should read");
        assert!(html.contains("SehatAI - Patient Report"));
    }

    #[test]
    fn test_assess_not_found_exit_1() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = config(dir.path());
        assert_eq!(exit_code(assess(&options(&["--nic", "00000"]), &config)), 1);
    }

    #[test]
    fn test_assess_qr_failures() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = config(dir.path());

        let blank = dir.path().join("blank.png");
        image::save_buffer(&blank, &[255u8; 32 * 32 * 4], 32, 32, image::ExtendedColorType::Rgba8)
            .expect("Should save png");
        let result = assess(&options(&["--qr", blank.to_str().expect("utf8 path")]), &config);
        assert!(matches!(result, Err(Failure::NoCode)));
        assert_eq!(exit_code(result), 1);

        let text = dir.path().join("notes.png");
        std::fs::write(&text, b"not an image").expect("Should write");
        let result = assess(&options(&["--qr", text.to_str().expect("utf8 path")]), &config);
        assert_eq!(exit_code(result), 3);
    }

    #[test]
    fn test_report_failure_exit_3() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let config = config(dir.path());
        // A regular file cannot serve as the report directory.
        let opts = options(&[
            "--nic",
            "35202-1234567-1",
            "--report-dir",
            config.dataset_path.to_str().expect("utf8 path"),
        ]);
        assert_eq!(exit_code(assess(&opts, &opts.apply(config.clone()))), 3);
    }
}
