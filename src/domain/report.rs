//! Printable patient report.

use chrono::{DateTime, Local};

use super::{evaluate, PatientRecord, RiskResult};

/// Everything needed to render one printable report.
#[derive(Debug, Clone)]
pub struct PatientReport {
    /// Random report identifier (UUID v4 format)
    pub id: String,
    pub generated_at: DateTime<Local>,
    pub record: PatientRecord,
    pub risk: RiskResult,
    /// Free-text notes typed by the clinician
    pub notes: String,
}

impl PatientReport {
    /// Build a report for a record, evaluating its risk now.
    #[must_use]
    pub fn new(record: PatientRecord, notes: impl Into<String>) -> Self {
        let risk = evaluate(&record);
        Self::with_risk(record, risk, notes)
    }

    /// Build a report from an already evaluated result.
    #[must_use]
    pub fn with_risk(record: PatientRecord, risk: RiskResult, notes: impl Into<String>) -> Self {
        Self {
            id: uuid_v4(),
            generated_at: Local::now(),
            record,
            risk,
            notes: notes.into(),
        }
    }

    /// Timestamp as shown in the report header.
    #[must_use]
    pub fn timestamp_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// File stem used when writing the report: `report-<nic>-<id prefix>`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` in the identifier are replaced.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let nic: String = self
            .record
            .nic
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("report-{}-{}", nic, &self.id[..8])
    }
}

/// Random UUID v4 from a ChaCha20 CSPRNG seeded by the OS.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
