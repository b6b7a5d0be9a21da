//! Patient lookup form: identifier and notes entry.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::application::DatasetStatus;
use crate::tui::styles::ClinicTheme;

use super::{render_header, render_key_hints, StatusMessage};

/// Which input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    Identifier,
    Notes,
}

/// Lookup form state
#[derive(Debug)]
pub struct LookupFormState {
    pub identifier: String,
    pub notes: String,
    pub focus: LookupField,
    pub message: Option<StatusMessage>,
    /// Position in the sample identifier list for F2 cycling
    sample_cursor: usize,
}

impl Default for LookupFormState {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            notes: String::new(),
            focus: LookupField::Identifier,
            message: None,
            sample_cursor: 0,
        }
    }
}

impl LookupFormState {
    /// Toggle focus between the two inputs
    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LookupField::Identifier => LookupField::Notes,
            LookupField::Notes => LookupField::Identifier,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LookupField::Identifier => &mut self.identifier,
            LookupField::Notes => &mut self.notes,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.focused_mut().push(c);
        self.message = None;
    }

    /// Insert a line break (notes only)
    pub fn input_newline(&mut self) {
        if self.focus == LookupField::Notes {
            self.notes.push('\n');
        }
    }

    pub fn delete_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn clear_field(&mut self) {
        self.focused_mut().clear();
    }

    /// Fill the identifier with the next sample from `samples`.
    pub fn cycle_sample(&mut self, samples: &[&str]) {
        if samples.is_empty() {
            self.message = Some(StatusMessage::Error(
                "No sample identifiers: the dataset is empty".to_string(),
            ));
            return;
        }
        let sample = samples[self.sample_cursor % samples.len()];
        self.sample_cursor = (self.sample_cursor + 1) % samples.len();
        self.identifier.zeroize();
        self.identifier.push_str(sample);
        self.focus = LookupField::Identifier;
        self.message = None;
    }

    /// Wipe typed identifier and notes from memory.
    pub fn clear_sensitive(&mut self) {
        self.identifier.zeroize();
        self.notes.zeroize();
        self.message = None;
        self.focus = LookupField::Identifier;
    }
}

/// Render the lookup form
pub fn render_lookup(
    f: &mut Frame,
    area: Rect,
    state: &LookupFormState,
    status: &DatasetStatus,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Dataset status
            Constraint::Length(3), // Identifier
            Constraint::Min(4),    // Notes
            Constraint::Length(1), // Message
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Patient Lookup", "Enter CNIC or scan QR");
    render_dataset_status(f, chunks[1], status);
    render_input(
        f,
        chunks[2],
        "CNIC",
        &state.identifier,
        "e.g. 35202-1234567-1",
        state.focus == LookupField::Identifier,
    );
    render_input(
        f,
        chunks[3],
        "OCR / Notes",
        &state.notes,
        "optional notes for the printed report",
        state.focus == LookupField::Notes,
    );

    if let Some(msg) = &state.message {
        f.render_widget(Paragraph::new(msg.to_line()), chunks[4]);
    }

    render_key_hints(
        f,
        chunks[5],
        &[
            ("Enter", "Fetch"),
            ("Tab", "Switch field"),
            ("F2", "Sample CNIC"),
            ("Ctrl+O", "Scan QR image"),
            ("Esc", "Quit"),
        ],
    );
}

fn render_dataset_status(f: &mut Frame, area: Rect, status: &DatasetStatus) {
    let line = match status {
        DatasetStatus::Loaded { records, source } => Line::from(vec![
            Span::styled("  OK ", ClinicTheme::success()),
            Span::styled(format!("{records} demo records"), ClinicTheme::text()),
            Span::styled(format!(" from {source}"), ClinicTheme::text_muted()),
        ]),
        DatasetStatus::Failed { source, reason } => Line::from(vec![
            Span::styled("  FAIL ", ClinicTheme::danger()),
            Span::styled(format!("patients dataset load failed ({source}): "), ClinicTheme::text()),
            Span::styled(reason.clone(), ClinicTheme::text_muted()),
        ]),
    };

    let block = Block::default()
        .title(Span::styled(" Dataset ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, hint: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (ClinicTheme::border_focused(), ClinicTheme::focused())
    } else {
        (ClinicTheme::border(), ClinicTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines: Vec<Line> = if value.is_empty() {
        vec![Line::from(Span::styled(hint.to_string(), ClinicTheme::text_muted()))]
    } else {
        value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), ClinicTheme::text())))
            .collect()
    };

    if focused {
        if value.is_empty() {
            lines = vec![Line::from(Span::styled("▌", ClinicTheme::cursor()))];
        } else if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("▌", ClinicTheme::cursor()));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut state = LookupFormState::default();
        for c in "123".chars() {
            state.input_char(c);
        }
        state.next_field();
        state.input_char('x');
        state.input_newline();
        state.input_char('y');
        assert_eq!(state.identifier, "123");
        assert_eq!(state.notes, "x\ny");

        state.delete_char();
        assert_eq!(state.notes, "x\n");
        state.clear_field();
        assert!(state.notes.is_empty());
        assert_eq!(state.identifier, "123");
    }

    #[test]
    fn test_newline_ignored_in_identifier() {
        let mut state = LookupFormState::default();
        state.input_newline();
        state.input_char('\t');
        assert!(state.identifier.is_empty());
    }

    #[test]
    fn test_cycle_sample() {
        let mut state = LookupFormState::default();
        state.next_field();
        state.cycle_sample(&["a", "b"]);
        assert_eq!(state.identifier, "a");
        assert_eq!(state.focus, LookupField::Identifier);
        state.cycle_sample(&["a", "b"]);
        assert_eq!(state.identifier, "b");
        state.cycle_sample(&["a", "b"]);
        assert_eq!(state.identifier, "a");

        state.cycle_sample(&[]);
        assert!(matches!(state.message, Some(StatusMessage::Error(_))));
    }

    #[test]
    fn test_clear_sensitive() {
        let mut state = LookupFormState::default();
        state.identifier.push_str("35202-1234567-1");
        state.notes.push_str("notes");
        state.clear_sensitive();
        assert!(state.identifier.is_empty());
        assert!(state.notes.is_empty());
    }
}
