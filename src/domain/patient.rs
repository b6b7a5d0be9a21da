//! Patient record as stored in the demo dataset.

use serde::{Deserialize, Serialize};

/// One patient from the static dataset.
///
/// Records are loaded once and never mutated. `medical_history` may be
/// missing, `null` or empty in the source document; all three mean
/// "no history".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// National identity number (CNIC), the dataset key
    pub nic: String,

    /// Full name
    pub name: String,

    /// Date of birth, display only
    #[serde(default)]
    pub dob: String,

    /// Age in years
    pub age: u32,

    #[serde(default)]
    pub gender: String,

    /// Phone number or other contact detail
    #[serde(default)]
    pub contact: String,

    /// Free-text medical history
    #[serde(default)]
    pub medical_history: Option<String>,
}

impl PatientRecord {
    /// Medical history text, empty when absent.
    #[must_use]
    pub fn history(&self) -> &str {
        self.medical_history.as_deref().unwrap_or("")
    }

    /// Medical history for display (`—` when absent or blank).
    #[must_use]
    pub fn history_display(&self) -> &str {
        match self.history().trim() {
            "" => "—",
            _ => self.history(),
        }
    }

    /// "DOB / Age" display string.
    #[must_use]
    pub fn dob_age_display(&self) -> String {
        format!("{} / {}", self.dob, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_history() {
        let json = r#"{
            "name": "Ayesha Khan",
            "nic": "35202-1234567-1",
            "dob": "1990-04-12",
            "age": 35,
            "gender": "Female",
            "contact": "0300-1234567"
        }"#;

        let record: PatientRecord = serde_json::from_str(json).expect("Should parse");
        assert_eq!(record.nic, "35202-1234567-1");
        assert_eq!(record.age, 35);
        assert!(record.medical_history.is_none());
        assert_eq!(record.history(), "");
        assert_eq!(record.history_display(), "—");
    }

    #[test]
    fn test_null_history_is_absent() {
        let json = r#"{"name":"A","nic":"1","age":20,"medical_history":null}"#;
        let record: PatientRecord = serde_json::from_str(json).expect("Should parse");
        assert!(record.medical_history.is_none());
        assert_eq!(record.dob, "");
    }

    #[test]
    fn test_negative_age_rejected() {
        let json = r#"{"name":"A","nic":"1","age":-4}"#;
        assert!(serde_json::from_str::<PatientRecord>(json).is_err());
    }

    #[test]
    fn test_dob_age_display() {
        let record = PatientRecord {
            nic: "1".into(),
            name: "A".into(),
            dob: "1970-01-01".into(),
            age: 55,
            gender: "Male".into(),
            contact: String::new(),
            medical_history: Some("Diabetes".into()),
        };
        assert_eq!(record.dob_age_display(), "1970-01-01 / 55");
        assert_eq!(record.history_display(), "Diabetes");
    }
}
