use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::prompt::{NarrationInput, NARRATION_SYSTEM_PROMPT};
use crate::domain::robustness::RobustnessResult;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use std::sync::Arc;
use tracing::{debug, warn};

pub const STILL_RUNNING: &str = "Still running robustness analysis.";
pub const MISSING_API_KEY: &str = "Server misconfigured: missing AI API key.";
pub const NARRATION_FALLBACK: &str =
    "AI explanation unavailable, but robustness analysis completed correctly.";

/// Plain-language explanation of an analysis result.
///
/// Never fails: every problem degrades to a fixed message.
pub struct NarrationUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl NarrationUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    pub async fn explain(&self, result: Option<&RobustnessResult>) -> String {
        let Some(result) = result else {
            return STILL_RUNNING.to_string();
        };

        if !result.is_success() {
            return format!("Analysis failed. Reason: {}", result.failure_reason());
        }

        if !self.config.has_api_key() {
            warn!("Narration requested without an API key");
            return MISSING_API_KEY.to_string();
        }

        match self.generate(result).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("Narration provider returned an empty reply");
                NARRATION_FALLBACK.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Narration provider failed");
                NARRATION_FALLBACK.to_string()
            }
        }
    }

    async fn generate(&self, result: &RobustnessResult) -> Result<String> {
        let user_prompt = NarrationInput::from_result(result).render();
        debug!(model = %self.config.model, "Requesting narration");

        let raw = self
            .llm_client
            .generate(&self.config, NARRATION_SYSTEM_PROMPT, &user_prompt)
            .await?;

        Ok(clean_llm_response(&raw))
    }
}
