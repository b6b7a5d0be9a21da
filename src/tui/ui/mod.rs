//! UI module: View components for the TUI.

pub mod lookup;
pub mod patient;
pub mod scan;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicTheme;

/// A one-line status shown under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub(crate) fn to_line(&self) -> Line<'_> {
        match self {
            Self::Info(text) => Line::from(vec![
                Span::styled("• ", ClinicTheme::info()),
                Span::styled(text.as_str(), ClinicTheme::text()),
            ]),
            Self::Error(text) => Line::from(vec![
                Span::styled("! ", ClinicTheme::danger()),
                Span::styled(text.as_str(), ClinicTheme::danger()),
            ]),
        }
    }
}

/// Render a screen header bar.
pub fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" SehatAI ", ClinicTheme::header()),
        Span::styled(" ", ClinicTheme::text()),
        Span::styled(title.to_string(), ClinicTheme::title()),
        Span::styled(format!(" │ {subtitle}"), ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

/// Render a footer of `[key] description` hints.
pub fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), ClinicTheme::key_hint()),
                Span::styled(format!("{desc} "), ClinicTheme::key_desc()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Simple rule-based demo score. It is not a medical inference and does not replace clinical evaluation.",
            ClinicTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Demo dataset only. No data leaves this machine.",
            ClinicTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
