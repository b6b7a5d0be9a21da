//! Patient panel: record details and risk result.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::Assessment;
use crate::domain::PatientRecord;
use crate::tui::styles::ClinicTheme;

use super::{render_header, render_key_hints, StatusMessage};

/// Render the patient panel
pub fn render_patient(
    f: &mut Frame,
    area: Rect,
    assessment: &Assessment,
    message: Option<&StatusMessage>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Cards
            Constraint::Length(1), // Message
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Patient", "Record and risk score");

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_record_card(f, cards[0], &assessment.record);
    render_risk_card(f, cards[1], assessment);

    if let Some(msg) = message {
        f.render_widget(Paragraph::new(msg.to_line()), chunks[2]);
    }

    render_key_hints(
        f,
        chunks[3],
        &[("P", "Print report"), ("N", "New lookup"), ("Esc", "Back")],
    );
}

/// Label/value rows shown on the patient card.
#[must_use]
pub fn record_rows(record: &PatientRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Name", record.name.clone()),
        ("CNIC", record.nic.clone()),
        ("DOB / Age", record.dob_age_display()),
        ("Gender", record.gender.clone()),
        ("Contact", record.contact.clone()),
        ("Medical History", record.history_display().to_string()),
    ]
}

fn render_record_card(f: &mut Frame, area: Rect, record: &PatientRecord) {
    let lines: Vec<Line> = record_rows(record)
        .into_iter()
        .flat_map(|(label, value)| {
            [
                Line::from(Span::styled(label, ClinicTheme::text_secondary())),
                Line::from(Span::styled(format!("  {value}"), ClinicTheme::text())),
            ]
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Patient Information ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_risk_card(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let risk = &assessment.risk;
    let style = ClinicTheme::risk_label(risk.label);

    let block = Block::default()
        .title(Span::styled(" AI Results ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score gauge
            Constraint::Length(2), // Label
            Constraint::Min(0),    // Explanation
        ])
        .margin(1)
        .split(inner);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Score ", ClinicTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(style)
        .percent(risk.score.min(100) as u16)
        .label(format!("{}%", risk.score));
    f.render_widget(gauge, chunks[0]);

    let label = Paragraph::new(Line::from(vec![
        Span::styled(format!("{}% — ", risk.score), ClinicTheme::text()),
        Span::styled(risk.label.to_string(), style.add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[1]);

    let explanation = Paragraph::new(Line::from(Span::styled(
        risk.explanation.clone(),
        ClinicTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(explanation, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rows_placeholder_history() {
        let record = PatientRecord {
            nic: "35202-1234567-1".to_string(),
            name: "Ayesha Khan".to_string(),
            dob: "1990-04-12".to_string(),
            age: 35,
            gender: "Female".to_string(),
            contact: "0300-1234567".to_string(),
            medical_history: Some("   ".to_string()),
        };
        let rows = record_rows(&record);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[2], ("DOB / Age", "1990-04-12 / 35".to_string()));
        assert_eq!(rows[5], ("Medical History", "—".to_string()));
    }
}
