//! Log sanitization for patient identifiers and contact details.
//!
//! Log lines are scanned for:
//! - CNIC numbers (`12345-1234567-1`) and bare 13-digit NICs
//! - Phone numbers (local `03xx` mobile and international formats)
//! - Email addresses
//! - ISO dates (dates of birth)
//! - Report UUIDs
//!
//! Sanitizing strings is a fallback. Call sites should avoid formatting
//! patient fields into log messages at all.
//!
//! `sanitize()` caps its input (see `SEHATAI_SANITIZE_MAX_BYTES`) so that a
//! huge log line cannot stall the writer.

use regex::{Regex, RegexSet};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PII_PATTERNS: OnceLock<PiiPatterns> = OnceLock::new();

/// Default cap: 16 KiB per call.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Environment override for the cap.
pub const SANITIZE_MAX_BYTES_ENV: &str = "SEHATAI_SANITIZE_MAX_BYTES";

struct PiiPattern {
    regex: Regex,
    replacement: &'static str,
}

struct PiiPatterns {
    set: RegexSet,
    patterns: Vec<PiiPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var(SANITIZE_MAX_BYTES_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static PiiPatterns {
    PII_PATTERNS.get_or_init(|| {
        // Order matters: CNIC before phone so the dashed form is tagged as an ID.
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (r"\b\d{5}-\d{7}-\d\b", "[REDACTED-NIC]"),
            (r"\b\d{13}\b", "[REDACTED-NIC]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (r"(?:\+92[-\s]?|\b0)3\d{2}[-\s]?\d{7}\b", "[REDACTED-PHONE]"),
            (
                r"\+\d{1,3}[-.\s]?\(?\d{2,4}\)?[-.\s]?\d{3,4}[-.\s]?\d{3,4}\b",
                "[REDACTED-PHONE]",
            ),
            (r"\b(?:19|20)\d{2}-\d{2}-\d{2}\b", "[REDACTED-DATE]"),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| PiiPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        PiiPatterns { set, patterns }
    })
}

/// Replace every PII match in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether a string contains potential PII.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// `MakeWriter` that hands out [`SanitizingWriter`]s over the inner writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M>(M);

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self(inner)
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.0.make_writer())
    }
}

/// Line-buffering writer: only complete, redacted lines reach the sink.
///
/// A partial line longer than twice the sanitize cap is forced out as a
/// line of its own; whatever is left is emitted on `flush`.
pub struct SanitizingWriter<W> {
    sink: W,
    pending: Vec<u8>,
}

impl<W: Write> SanitizingWriter<W> {
    fn new(sink: W) -> Self {
        Self {
            sink,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        let clean = sanitize(&String::from_utf8_lossy(bytes));
        self.sink.write_all(clean.as_bytes())
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        if let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
            for line in complete.split_inclusive(|&b| b == b'\n') {
                self.emit(line)?;
            }
        }

        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            let overlong = std::mem::take(&mut self.pending);
            self.emit(&overlong)?;
            self.sink.write_all(b"\n")?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.sink.flush()
    }
}
