use crate::domain::robustness::{DisplayEntry, RobustnessReport, RobustnessResult, ScoreKind};

/// Turns a raw analysis result into ordered display entries.
///
/// Order is fixed: the four scores, then safe-limit guidelines when the
/// script reported them, then the dominant-feature warning when present.
pub struct ReportAggregator;

impl ReportAggregator {
    pub fn aggregate(result: &RobustnessResult) -> RobustnessReport {
        if !result.is_success() {
            return RobustnessReport::Error {
                reason: result.failure_reason().to_string(),
            };
        }

        let mut entries: Vec<DisplayEntry> = ScoreKind::ALL
            .iter()
            .map(|kind| DisplayEntry::score(*kind, kind.value_in(result)))
            .collect();

        if let Some(limits) = &result.safe_limits {
            entries.push(DisplayEntry::guideline(
                "Max Safe Noise",
                format!("{}%", limits.max_noise_percent),
            ));
            entries.push(DisplayEntry::guideline(
                "Max Safe Missing",
                format!("{}%", limits.max_missing_percent),
            ));
            entries.push(DisplayEntry::guideline(
                "Max Safe Bias",
                format!("{}", limits.max_bias_factor),
            ));
        }

        if let Some(dominant) = &result.dominant_feature {
            entries.push(DisplayEntry::dominant_feature(dominant));
        }

        RobustnessReport::Success {
            target: result.target_detected.clone(),
            entries,
        }
    }
}
