use crate::domain::robustness::{RobustnessResult, ScoreKind};
use serde::{Deserialize, Serialize};

pub const NARRATION_SYSTEM_PROMPT: &str = "You are DataBuddy, an ML robustness assistant. \
Respond in plain text only. Do not use Markdown, asterisks, hash signs, dashes as bullets, \
code blocks or slashes.";

/// The only fields of a result the narration service receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationInput {
    pub target: String,
    pub score: f64,
    pub noise_score: f64,
    pub missing_score: f64,
    pub bias_score: f64,
}

impl NarrationInput {
    pub fn from_result(result: &RobustnessResult) -> Self {
        Self {
            target: result.target_or_unknown().to_string(),
            score: ScoreKind::Overall.value_in(result),
            noise_score: ScoreKind::Noise.value_in(result),
            missing_score: ScoreKind::Missing.value_in(result),
            bias_score: ScoreKind::Bias.value_in(result),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Target variable detected: {}\n\
             Overall robustness score: {}%\n\
             Noise robustness score: {}%\n\
             Missingness robustness score: {}%\n\
             Bias / drift robustness score: {}%\n\
             \n\
             Explain these results in simple language for a 10th-grade student.\n\
             Be very concise and to the point.\n\
             Use at most 5 short points, one per line.\n\
             Avoid jargon.",
            self.target, self.score, self.noise_score, self.missing_score, self.bias_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_partial_result() {
        let mut result = RobustnessResult::success(72.5, 80.0, 60.0, 0.0);
        result.bias_score = None;

        let input = NarrationInput::from_result(&result);
        assert_eq!(input.target, "unknown");
        assert_eq!(input.bias_score, 0.0);
    }

    #[test]
    fn test_render_carries_every_score() {
        let result = RobustnessResult::success(72.5, 80.0, 61.25, 12.0).with_target("price");
        let prompt = NarrationInput::from_result(&result).render();

        assert!(prompt.contains("Target variable detected: price"));
        assert!(prompt.contains("Overall robustness score: 72.5%"));
        assert!(prompt.contains("Noise robustness score: 80%"));
        assert!(prompt.contains("Missingness robustness score: 61.25%"));
        assert!(prompt.contains("Bias / drift robustness score: 12%"));
    }
}
