//! Report adapter: printable HTML documents and plain-text summaries.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::domain::PatientReport;
use crate::ports::ReportSink;

/// Error type for report output.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Cannot write report {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        r#"    <div class="pfield"><b>{}</b><div>{}</div></div>"#,
        label,
        escape_html(value)
    );
}

/// Render a standalone, print-ready HTML document.
#[must_use]
pub fn render_html(report: &PatientReport) -> String {
    let r = &report.record;
    let risk = &report.risk;

    let mut info = String::new();
    field(&mut info, "Name", &r.name);
    field(&mut info, "CNIC", &r.nic);
    field(&mut info, "DOB / Age", &r.dob_age_display());
    field(&mut info, "Gender", &r.gender);
    field(&mut info, "Contact", &r.contact);
    field(&mut info, "Medical History", r.history_display());

    format!(
        r#"<html>
<head>
  <title>SehatAI - Patient Report</title>
  <style>
    body{{font-family:Inter,Arial;padding:20px;color:#071032}}
    .header{{display:flex;justify-content:space-between;align-items:center}}
    .card{{border:1px solid #e6eef2;padding:16px;border-radius:8px;margin-top:12px}}
    .progress-wrap{{background:#eef2f7;border-radius:6px;height:12px;overflow:hidden}}
    .progress-bar{{height:12px}}
    .muted{{color:#64748b}}
  </style>
</head>
<body onload="window.print()">
  <div class="header">
    <div><h2>SehatAI — Clinic Demo</h2><div class="muted">Demo report {id}</div></div>
    <div>{timestamp}</div>
  </div>
  <div class="card"><h3>Patient Information</h3>
{info}  </div>
  <div class="card"><h3>AI Results</h3>
    <div><b>Risk Score</b></div>
    <div style="margin:10px 0">
      <div class="progress-wrap">
        <div class="progress-bar" style="width:{score}%; background:{color}"></div>
      </div>
      <div style="margin-top:8px">{score}% — <strong>{label}</strong></div>
      <div class="muted" style="margin-top:6px">{explanation}</div>
    </div>
  </div>
  <div class="card"><h3>OCR / Notes</h3><pre>{notes}</pre></div>
  <div style="margin-top:20px">Doctor Signature: ____________________</div>
</body>
</html>
"#,
        id = escape_html(&report.id),
        timestamp = escape_html(&report.timestamp_display()),
        info = info,
        score = risk.score,
        color = risk.color,
        label = risk.label,
        explanation = escape_html(&risk.explanation),
        notes = escape_html(&report.notes),
    )
}

/// Render a plain-text summary for terminals and pipes.
#[must_use]
pub fn render_text(report: &PatientReport) -> String {
    let r = &report.record;
    let risk = &report.risk;

    let mut out = String::new();
    let _ = writeln!(out, "SehatAI — Clinic Demo ({})", report.timestamp_display());
    let _ = writeln!(out);
    let _ = writeln!(out, "Name:            {}", r.name);
    let _ = writeln!(out, "CNIC:            {}", r.nic);
    let _ = writeln!(out, "DOB / Age:       {}", r.dob_age_display());
    let _ = writeln!(out, "Gender:          {}", r.gender);
    let _ = writeln!(out, "Contact:         {}", r.contact);
    let _ = writeln!(out, "Medical History: {}", r.history_display());
    let _ = writeln!(out);
    let _ = writeln!(out, "Risk Score:      {}% — {}", risk.score, risk.label);
    let _ = writeln!(out, "                 {}", risk.explanation);
    if !report.notes.trim().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Notes:");
        for line in report.notes.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// Writes HTML reports into a directory.
#[derive(Debug, Clone)]
pub struct HtmlReportWriter {
    dir: PathBuf,
}

impl HtmlReportWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportSink for HtmlReportWriter {
    type Error = ReportError;

    fn write_report(&self, report: &PatientReport) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(format!("{}.html", report.file_stem()));
        std::fs::write(&path, render_html(report)).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Report {} written", report.id);
        Ok(path)
    }
}
