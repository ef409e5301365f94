use serde::{Deserialize, Serialize};

const EXCELLENT_FROM: f64 = 80.0;
const GOOD_FROM: f64 = 60.0;
const FAIR_FROM: f64 = 40.0;

/// Qualitative band for a 0-100 robustness score.
/// Each band is inclusive at its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl StatusLabel {
    /// NaN falls through every comparison and lands in `NeedsImprovement`.
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_FROM {
            StatusLabel::Excellent
        } else if score >= GOOD_FROM {
            StatusLabel::Good
        } else if score >= FAIR_FROM {
            StatusLabel::Fair
        } else {
            StatusLabel::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Excellent => "Excellent",
            StatusLabel::Good => "Good",
            StatusLabel::Fair => "Fair",
            StatusLabel::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            StatusLabel::Excellent => "▲",
            StatusLabel::Good => "●",
            StatusLabel::Fair | StatusLabel::NeedsImprovement => "▼",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (0.0, StatusLabel::NeedsImprovement),
            (39.9, StatusLabel::NeedsImprovement),
            (40.0, StatusLabel::Fair),
            (59.9, StatusLabel::Fair),
            (60.0, StatusLabel::Good),
            (79.9, StatusLabel::Good),
            (80.0, StatusLabel::Excellent),
            (100.0, StatusLabel::Excellent),
        ];

        for (score, expected) in cases {
            assert_eq!(StatusLabel::from_score(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_nan_needs_improvement() {
        assert_eq!(StatusLabel::from_score(f64::NAN), StatusLabel::NeedsImprovement);
    }

    #[test]
    fn test_serialized_name_has_space() {
        let json = serde_json::to_string(&StatusLabel::NeedsImprovement).unwrap();
        assert_eq!(json, "\"Needs Improvement\"");
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(StatusLabel::Excellent.glyph(), "▲");
        assert_eq!(StatusLabel::Good.glyph(), "●");
        assert_eq!(StatusLabel::Fair.glyph(), "▼");
    }
}
