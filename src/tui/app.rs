//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - Background QR scanning via the scan worker

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{HtmlReportWriter, ImageFileReader, JsonFileDataset, RqrrDecoder};
use crate::application::{Assessment, PatientService, ReportService, ScanOutcome, ScanService};
use crate::config::AppConfig;
use crate::domain::LookupError;

use super::ui::{
    lookup::{render_lookup, LookupField, LookupFormState},
    patient::render_patient,
    render_disclaimer,
    scan::{render_scan, ScanPhase, ScanState},
    StatusMessage,
};
use super::worker::{ScanProgress, ScanWorker, ScanWorkerHandle};

/// Scanner wired to image files and `rqrr`.
pub type FileScanService = ScanService<ImageFileReader, RqrrDecoder>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lookup,
    Scan,
    Patient,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,

    patient_service: PatientService,
    scan_service: FileScanService,
    report_service: ReportService<HtmlReportWriter>,

    lookup_state: LookupFormState,
    scan_state: ScanState,

    /// Record currently on the patient screen
    current: Option<Assessment>,
    /// Status line on the patient screen (report written / failed)
    patient_message: Option<StatusMessage>,

    pending_scan: Option<ScanWorkerHandle>,
    /// When the current scan phase started (for the progress animation)
    phase_started_at: Option<Instant>,
}

impl App {
    /// Create an application from configuration, loading the dataset.
    ///
    /// A dataset that fails to load does not stop startup; the lookup
    /// screen shows the failure and every lookup reports "not found".
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let patient_service = PatientService::load(&JsonFileDataset::new(&config.dataset_path));
        let scan_service = ScanService::new(Arc::new(ImageFileReader), Arc::new(RqrrDecoder::new()));
        let report_service = ReportService::new(Arc::new(HtmlReportWriter::new(&config.report_dir)));

        Self::with_dependencies(patient_service, scan_service, report_service)
    }

    /// Create an application with injected services.
    #[must_use]
    pub fn with_dependencies(
        patient_service: PatientService,
        scan_service: FileScanService,
        report_service: ReportService<HtmlReportWriter>,
    ) -> Self {
        Self {
            screen: Screen::Lookup,
            should_quit: false,
            patient_service,
            scan_service,
            report_service,
            lookup_state: LookupFormState::default(),
            scan_state: ScanState::default(),
            current: None,
            patient_message: None,
            pending_scan: None,
            phase_started_at: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_scan_progress();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Lookup => render_lookup(
                        f,
                        chunks[0],
                        &self.lookup_state,
                        self.patient_service.status(),
                    ),
                    Screen::Scan => render_scan(f, chunks[0], &self.scan_state),
                    Screen::Patient => {
                        if let Some(assessment) = &self.current {
                            render_patient(
                                f,
                                chunks[0],
                                assessment,
                                self.patient_message.as_ref(),
                            );
                        }
                    }
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress messages from the scan worker.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self.pending_scan.as_ref().and_then(ScanWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                ScanProgress::Loading => {
                    self.scan_state.phase = ScanPhase::Loading { progress: 0.0 };
                    self.phase_started_at = Some(Instant::now());
                }
                ScanProgress::Decoding => {
                    let floor = self.scan_state.progress().unwrap_or(0.0).max(0.4);
                    self.scan_state.phase = ScanPhase::Decoding { progress: floor };
                    self.phase_started_at = Some(Instant::now());
                }
                ScanProgress::Complete(outcome) => {
                    self.finish_scan();
                    self.apply_scan_outcome(outcome);
                    break;
                }
                ScanProgress::Error(message) => {
                    self.finish_scan();
                    self.scan_state.phase = ScanPhase::Done {
                        message: StatusMessage::Error(message),
                    };
                    break;
                }
            }
        }
    }

    fn finish_scan(&mut self) {
        self.pending_scan = None;
        self.phase_started_at = None;
    }

    /// Smooth, monotonic progress that approaches each phase's ceiling.
    fn tick_scan_progress(&mut self) {
        let Some(started_at) = self.phase_started_at else {
            return;
        };
        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();

        let (floor, target, tau) = match self.scan_state.phase {
            ScanPhase::Loading { .. } => (0.02, 0.4, 0.5),
            ScanPhase::Decoding { .. } => (0.4, 0.95, 1.5),
            _ => return,
        };
        let current = self.scan_state.progress().unwrap_or(floor);
        let k = 1.0 - (-elapsed / tau).exp();
        let progress = (floor + (target - floor) * k).max(current).min(target);

        self.scan_state.phase = match self.scan_state.phase {
            ScanPhase::Loading { .. } => ScanPhase::Loading { progress },
            _ => ScanPhase::Decoding { progress },
        };
    }

    /// Resolve a finished scan against the dataset.
    fn apply_scan_outcome(&mut self, outcome: ScanOutcome) {
        let ScanOutcome::Decoded(payload) = &outcome else {
            self.scan_state.phase = ScanPhase::Done {
                message: StatusMessage::Error(outcome.message()),
            };
            return;
        };

        match self.patient_service.assess(payload) {
            Ok(assessment) => {
                self.lookup_state.identifier = payload.trim().to_string();
                self.scan_state = ScanState::default();
                self.show_patient(assessment);
            }
            Err(_) => {
                self.scan_state.phase = ScanPhase::Done {
                    message: StatusMessage::Error(format!(
                        "{} — not present in demo dataset",
                        outcome.message()
                    )),
                };
            }
        }
    }

    fn show_patient(&mut self, assessment: Assessment) {
        self.current = Some(assessment);
        self.patient_message = None;
        self.screen = Screen::Patient;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Lookup => self.handle_lookup_key(key, modifiers),
            Screen::Scan => self.handle_scan_key(key),
            Screen::Patient => self.handle_patient_key(key),
        }
    }

    fn handle_lookup_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('o') {
                self.screen = Screen::Scan;
            }
            return;
        }

        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => self.lookup_state.next_field(),
            KeyCode::F(2) => {
                let samples = self.patient_service.dataset().identifiers();
                self.lookup_state.cycle_sample(&samples);
            }
            KeyCode::Char(c) => self.lookup_state.input_char(c),
            KeyCode::Backspace => self.lookup_state.delete_char(),
            KeyCode::Delete => self.lookup_state.clear_field(),
            KeyCode::Enter => match self.lookup_state.focus {
                LookupField::Notes => self.lookup_state.input_newline(),
                LookupField::Identifier => self.submit_lookup(),
            },
            _ => {}
        }
    }

    fn submit_lookup(&mut self) {
        match self.patient_service.assess(&self.lookup_state.identifier) {
            Ok(assessment) => {
                self.lookup_state.message = None;
                self.show_patient(assessment);
            }
            Err(e @ LookupError::EmptyIdentifier) => {
                self.lookup_state.message = Some(StatusMessage::Error(e.to_string()));
            }
            Err(LookupError::NotFound(_)) => {
                self.lookup_state.message = Some(StatusMessage::Error(
                    "Patient not found in demo dataset. Use sample NICs in patients.json (F2)"
                        .to_string(),
                ));
            }
        }
    }

    fn handle_scan_key(&mut self, key: KeyCode) {
        if self.scan_state.is_running() {
            return;
        }

        match key {
            KeyCode::Esc => self.screen = Screen::Lookup,
            KeyCode::Char(c) => self.scan_state.input_char(c),
            KeyCode::Backspace => self.scan_state.delete_char(),
            KeyCode::Enter => self.start_scan(),
            _ => {}
        }
    }

    fn start_scan(&mut self) {
        let path = self.scan_state.path.trim();
        if path.is_empty() {
            self.scan_state.phase = ScanPhase::Done {
                message: StatusMessage::Error("Enter the path of an image first.".to_string()),
            };
            return;
        }

        let path = PathBuf::from(path);
        self.scan_state.phase = ScanPhase::Loading { progress: 0.0 };
        self.phase_started_at = Some(Instant::now());
        self.pending_scan = Some(ScanWorker::spawn(self.scan_service.clone(), path));
    }

    fn handle_patient_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('p') | KeyCode::Char('P') => self.print_report(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.current = None;
                self.lookup_state.clear_sensitive();
                self.screen = Screen::Lookup;
            }
            KeyCode::Esc => self.screen = Screen::Lookup,
            _ => {}
        }
    }

    fn print_report(&mut self) {
        let Some(assessment) = &self.current else {
            return;
        };

        self.patient_message = Some(
            match self
                .report_service
                .generate(assessment, &self.lookup_state.notes)
            {
                Ok(path) => StatusMessage::Info(format!(
                    "Report written to {} (open it in a browser to print)",
                    path.display()
                )),
                Err(e) => {
                    tracing::error!("Report generation failed: {}", e);
                    StatusMessage::Error(e.to_string())
                }
            },
        );
    }
}
