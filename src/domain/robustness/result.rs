use serde::{Deserialize, Serialize};

/// Outcome flag written by the analysis script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeLimits {
    #[serde(default)]
    pub max_noise_percent: f64,
    #[serde(default)]
    pub max_missing_percent: f64,
    #[serde(default)]
    pub max_bias_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantFeature {
    pub feature: String,
    pub influence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Result document produced by one run of the external analysis process.
///
/// Everything except `status` may be absent; a failed run carries only a
/// `reason`. Scores are expected in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustnessResult {
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_detected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_limits: Option<SafeLimits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_feature: Option<DominantFeature>,
}

impl RobustnessResult {
    pub fn success(score: f64, noise_score: f64, missing_score: f64, bias_score: f64) -> Self {
        Self {
            status: AnalysisStatus::Success,
            reason: None,
            target_detected: None,
            score: Some(score),
            noise_score: Some(noise_score),
            missing_score: Some(missing_score),
            bias_score: Some(bias_score),
            safe_limits: None,
            dominant_feature: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: AnalysisStatus::Error,
            reason: Some(reason.into()),
            target_detected: None,
            score: None,
            noise_score: None,
            missing_score: None,
            bias_score: None,
            safe_limits: None,
            dominant_feature: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_detected = Some(target.into());
        self
    }

    /// Anything other than an explicit success is treated as a failure.
    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }

    pub fn failure_reason(&self) -> &str {
        match (&self.reason, self.status) {
            (Some(reason), _) => reason,
            (None, AnalysisStatus::Unknown) => "Unrecognised analysis status",
            (None, _) => "No reason provided",
        }
    }

    pub fn target_or_unknown(&self) -> &str {
        self.target_detected.as_deref().unwrap_or("unknown")
    }
}
