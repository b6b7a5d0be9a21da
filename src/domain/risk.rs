//! Rule-based risk scoring.
//!
//! The score is a mock used for demonstration only: a base value plus
//! additive rules over age and medical-history keywords, clamped above.

use super::PatientRecord;

/// Starting score before any rule applies.
pub const BASE_SCORE: u32 = 10;

/// Upper bound applied after all rules.
pub const MAX_SCORE: u32 = 95;

/// Age bands checked from the highest threshold down; first match wins.
const AGE_BANDS: [(u32, u32); 3] = [(50, 30), (40, 20), (30, 10)];

/// History keywords (lowercase) and their addends; each applies at most once.
const HISTORY_RULES: [(&str, u32); 2] = [("diabetes", 30), ("hypertension", 20)];

/// Qualitative label derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Normal,
    Attention,
    Urgent,
}

impl RiskLabel {
    /// Classify a clamped score. Boundaries are inclusive upward.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            Self::Urgent
        } else if score >= 40 {
            Self::Attention
        } else {
            Self::Normal
        }
    }

    /// Display color token (hex).
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Normal => "#10b981",    // green
            Self::Attention => "#f59e0b", // amber
            Self::Urgent => "#ef4444",    // red
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Attention => write!(f, "Attention"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

/// Output of [`evaluate`]. Recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskResult {
    /// Clamped score in `[BASE_SCORE, MAX_SCORE]`
    pub score: u32,
    pub label: RiskLabel,
    /// Hex color token, always `label.color()`
    pub color: &'static str,
    pub explanation: String,
}

/// Addend for an age: +30 from 50, +20 from 40, +10 from 30, else 0.
#[must_use]
pub fn age_addend(age: u32) -> u32 {
    AGE_BANDS
        .iter()
        .find(|(threshold, _)| age >= *threshold)
        .map_or(0, |(_, addend)| *addend)
}

/// Sum of keyword addends found (case-insensitively) in the history text.
#[must_use]
pub fn history_addend(history: &str) -> u32 {
    let history = history.to_lowercase();
    HISTORY_RULES
        .iter()
        .filter(|(keyword, _)| history.contains(keyword))
        .map(|(_, addend)| addend)
        .sum()
}

/// Score before clamping.
#[must_use]
pub fn raw_score(record: &PatientRecord) -> u32 {
    BASE_SCORE + age_addend(record.age) + history_addend(record.history())
}

/// Apply the upper clamp. There is no lower clamp.
#[must_use]
pub fn clamp_score(raw: u32) -> u32 {
    raw.min(MAX_SCORE)
}

/// Evaluate a record. Pure and total.
#[must_use]
pub fn evaluate(record: &PatientRecord) -> RiskResult {
    let score = clamp_score(raw_score(record));
    let label = RiskLabel::from_score(score);

    RiskResult {
        score,
        label,
        color: label.color(),
        explanation: format!("Simple rule-based demo score ({score}%)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: u32, history: Option<&str>) -> PatientRecord {
        PatientRecord {
            nic: "35202-0000000-0".to_string(),
            name: "Test".to_string(),
            dob: String::new(),
            age,
            gender: String::new(),
            contact: String::new(),
            medical_history: history.map(str::to_string),
        }
    }

    #[test]
    fn test_age_bands() {
        for age in 0..30 {
            assert_eq!(age_addend(age), 0, "age {age}");
        }
        for age in 30..40 {
            assert_eq!(age_addend(age), 10, "age {age}");
        }
        for age in 40..50 {
            assert_eq!(age_addend(age), 20, "age {age}");
        }
        for age in [50, 51, 80, 120, u32::MAX] {
            assert_eq!(age_addend(age), 30, "age {age}");
        }
    }

    #[test]
    fn test_history_keywords_case_insensitive() {
        assert_eq!(history_addend("DIABETES"), 30);
        assert_eq!(history_addend("mild Hypertension"), 20);
        assert_eq!(history_addend("Diabetes, Hypertension"), 50);
        assert_eq!(history_addend("diabetes diabetes"), 30);
        assert_eq!(history_addend("asthma"), 0);
        assert_eq!(history_addend(""), 0);
    }

    #[test]
    fn test_scenario_urgent() {
        let result = evaluate(&patient(55, Some("Diabetes, Hypertension")));
        assert_eq!(result.score, 90);
        assert_eq!(result.label, RiskLabel::Urgent);
        assert_eq!(result.color, "#ef4444");
    }

    #[test]
    fn test_scenario_normal() {
        let result = evaluate(&patient(25, Some("")));
        assert_eq!(result.score, 10);
        assert_eq!(result.label, RiskLabel::Normal);
        assert_eq!(result.color, "#10b981");
        assert_eq!(result.explanation, "Simple rule-based demo score (10%)");
    }

    #[test]
    fn test_scenario_attention() {
        let result = evaluate(&patient(45, Some("Hypertension")));
        assert_eq!(result.score, 50);
        assert_eq!(result.label, RiskLabel::Attention);
        assert_eq!(result.color, "#f59e0b");
    }

    #[test]
    fn test_scenario_long_history_not_clamped() {
        let result = evaluate(&patient(60, Some("Diabetes and Hypertension and more")));
        assert_eq!(result.score, 90);
        assert_eq!(result.label, RiskLabel::Urgent);
    }

    #[test]
    fn test_missing_history_is_empty() {
        assert_eq!(evaluate(&patient(25, None)), evaluate(&patient(25, Some(""))));
    }

    #[test]
    fn test_clamp_only_above_max() {
        assert_eq!(clamp_score(94), 94);
        assert_eq!(clamp_score(95), 95);
        assert_eq!(clamp_score(96), 95);
        assert_eq!(clamp_score(BASE_SCORE + 30 + 50 + 60), MAX_SCORE);
        assert_eq!(clamp_score(3), 3);
        // Highest reachable raw score with the current rules is exactly 90.
        assert_eq!(raw_score(&patient(99, Some("diabetes hypertension"))), 90);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(RiskLabel::from_score(39), RiskLabel::Normal);
        assert_eq!(RiskLabel::from_score(40), RiskLabel::Attention);
        assert_eq!(RiskLabel::from_score(69), RiskLabel::Attention);
        assert_eq!(RiskLabel::from_score(70), RiskLabel::Urgent);
        assert_eq!(RiskLabel::from_score(95), RiskLabel::Urgent);
    }

    #[test]
    fn test_score_bounds_and_idempotence() {
        let histories = [
            None,
            Some(""),
            Some("diabetes"),
            Some("HYPERTENSION"),
            Some("Diabetes; hypertension"),
        ];
        for age in (0..=110).step_by(5) {
            for history in histories {
                let record = patient(age, history);
                let first = evaluate(&record);
                assert!((BASE_SCORE..=MAX_SCORE).contains(&first.score));
                assert_eq!(first.color, first.label.color());
                assert_eq!(first, evaluate(&record));
            }
        }
    }

    #[test]
    fn test_band_boundary_takes_higher_band() {
        assert_eq!(evaluate(&patient(30, None)).score, 20);
        assert_eq!(evaluate(&patient(40, None)).score, 30);
        assert_eq!(evaluate(&patient(50, None)).score, 40);
        assert_eq!(evaluate(&patient(50, None)).label, RiskLabel::Attention);
    }
}
