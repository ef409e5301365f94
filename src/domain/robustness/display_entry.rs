use super::{DominantFeature, RobustnessResult, StatusLabel};
use serde::{Deserialize, Serialize};

/// The four perturbation scores, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    Overall,
    Noise,
    Missing,
    Bias,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 4] = [
        ScoreKind::Overall,
        ScoreKind::Noise,
        ScoreKind::Missing,
        ScoreKind::Bias,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreKind::Overall => "Overall Robustness",
            ScoreKind::Noise => "Noise Resilience",
            ScoreKind::Missing => "Missing Data Handling",
            ScoreKind::Bias => "Bias/Drift Score",
        }
    }

    /// Absent scores read as 0 so they label as "Needs Improvement".
    pub fn value_in(&self, result: &RobustnessResult) -> f64 {
        let score = match self {
            ScoreKind::Overall => result.score,
            ScoreKind::Noise => result.noise_score,
            ScoreKind::Missing => result.missing_score,
            ScoreKind::Bias => result.bias_score,
        };
        score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Score,
    Guideline,
    Warning,
    Error,
}

/// One rendering-ready card: label, value and qualitative tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub kind: EntryKind,
    pub label: String,
    pub value: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
}

impl DisplayEntry {
    pub fn score(kind: ScoreKind, score: f64) -> Self {
        let status = StatusLabel::from_score(score);
        Self {
            kind: EntryKind::Score,
            label: kind.label().to_string(),
            value: format!("{}%", score),
            tag: status.as_str().to_string(),
            status: Some(status),
            glyph: Some(status.glyph().to_string()),
        }
    }

    pub fn guideline(label: &str, value: String) -> Self {
        Self {
            kind: EntryKind::Guideline,
            label: label.to_string(),
            value,
            tag: "Guideline".to_string(),
            status: None,
            glyph: None,
        }
    }

    pub fn dominant_feature(dominant: &DominantFeature) -> Self {
        Self {
            kind: EntryKind::Warning,
            label: "Dominant Feature Detected".to_string(),
            value: dominant.feature.clone(),
            tag: format!("Influence: {}", dominant.influence),
            status: None,
            glyph: None,
        }
    }

    pub fn error(reason: &str) -> Self {
        Self {
            kind: EntryKind::Error,
            label: "Analysis Failed".to_string(),
            value: reason.to_string(),
            tag: "error".to_string(),
            status: None,
            glyph: None,
        }
    }
}

/// Interpreted analysis outcome.
///
/// A failed run short-circuits to its reason; no score is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RobustnessReport {
    Error {
        reason: String,
    },
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        entries: Vec<DisplayEntry>,
    },
}

impl RobustnessReport {
    pub fn is_failure(&self) -> bool {
        matches!(self, RobustnessReport::Error { .. })
    }

    /// Flattened entries; a failure yields exactly one error entry.
    pub fn entries(&self) -> Vec<DisplayEntry> {
        match self {
            RobustnessReport::Error { reason } => vec![DisplayEntry::error(reason)],
            RobustnessReport::Success { entries, .. } => entries.clone(),
        }
    }

    pub fn status_labels(&self) -> Vec<StatusLabel> {
        match self {
            RobustnessReport::Error { .. } => Vec::new(),
            RobustnessReport::Success { entries, .. } => {
                entries.iter().filter_map(|entry| entry.status).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_entry_formats_like_a_percentage() {
        let entry = DisplayEntry::score(ScoreKind::Noise, 85.0);
        assert_eq!(entry.label, "Noise Resilience");
        assert_eq!(entry.value, "85%");
        assert_eq!(entry.tag, "Excellent");
        assert_eq!(entry.glyph.as_deref(), Some("▲"));

        let entry = DisplayEntry::score(ScoreKind::Bias, 71.73);
        assert_eq!(entry.value, "71.73%");
        assert_eq!(entry.status, Some(StatusLabel::Good));
    }

    #[test]
    fn test_missing_score_reads_as_zero() {
        let mut result = RobustnessResult::success(90.0, 90.0, 90.0, 90.0);
        result.missing_score = None;
        assert_eq!(ScoreKind::Missing.value_in(&result), 0.0);
    }

    #[test]
    fn test_failure_report_has_single_entry() {
        let report = RobustnessReport::Error {
            reason: "no numeric target".to_string(),
        };
        let entries = report.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Error);
        assert_eq!(entries[0].value, "no numeric target");
        assert!(report.status_labels().is_empty());
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let report = RobustnessReport::Error {
            reason: "boom".to_string(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["reason"], "boom");
    }
}
