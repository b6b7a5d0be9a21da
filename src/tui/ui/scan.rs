//! QR scan view: image path entry and decode progress.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::styles::ClinicTheme;

use super::{render_header, render_key_hints, StatusMessage};

/// Scan phase
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Typing the image path
    Editing,
    Loading { progress: f64 },
    Decoding { progress: f64 },
    /// Finished; the message says what happened
    Done { message: StatusMessage },
}

/// Scan screen state
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    pub path: String,
    pub phase: ScanPhase,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            path: String::new(),
            phase: ScanPhase::Editing,
        }
    }
}

impl ScanState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, ScanPhase::Loading { .. } | ScanPhase::Decoding { .. })
    }

    /// Progress of a running scan.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match self.phase {
            ScanPhase::Loading { progress } | ScanPhase::Decoding { progress } => Some(progress),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.path.push(c);
            self.phase = ScanPhase::Editing;
        }
    }

    pub fn delete_char(&mut self) {
        self.path.pop();
        self.phase = ScanPhase::Editing;
    }
}

/// Render the scan screen
pub fn render_scan(f: &mut Frame, area: Rect, state: &ScanState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Path
            Constraint::Min(0),    // Progress / result
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Scan QR Image", "PNG, JPEG, BMP or GIF");

    let editing = state.phase == ScanPhase::Editing;
    let path_line = if state.path.is_empty() {
        Line::from(Span::styled("path to an image of the patient's card", ClinicTheme::text_muted()))
    } else {
        Line::from(vec![
            Span::styled(state.path.clone(), ClinicTheme::text()),
            if editing {
                Span::styled("▌", ClinicTheme::cursor())
            } else {
                Span::raw("")
            },
        ])
    };
    let path_block = Block::default()
        .title(Span::styled(" Image file ", ClinicTheme::focused()))
        .borders(Borders::ALL)
        .border_style(if editing {
            ClinicTheme::border_focused()
        } else {
            ClinicTheme::border()
        });
    f.render_widget(Paragraph::new(path_line).block(path_block), chunks[1]);

    match &state.phase {
        ScanPhase::Editing => {}
        ScanPhase::Loading { progress } => {
            render_progress(f, chunks[2], "Processing image...", *progress)
        }
        ScanPhase::Decoding { progress } => {
            render_progress(f, chunks[2], "Searching for a QR code...", *progress)
        }
        ScanPhase::Done { message } => {
            let p = Paragraph::new(vec![Line::from(""), message.to_line()])
                .alignment(Alignment::Center);
            f.render_widget(p, chunks[2]);
        }
    }

    let hints: &[(&str, &str)] = if state.is_running() {
        &[("Ctrl+Q", "Quit")]
    } else {
        &[("Enter", "Scan"), ("Esc", "Back to lookup")]
    };
    render_key_hints(f, chunks[3], hints);
}

fn render_progress(f: &mut Frame, area: Rect, description: &str, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::info())
        .percent((progress.clamp(0.0, 1.0) * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[0]);

    let desc = Paragraph::new(Line::from(Span::styled(
        description.to_string(),
        ClinicTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[1]);
}
