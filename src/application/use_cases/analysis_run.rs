use crate::domain::error::Result;
use crate::domain::robustness::RobustnessResult;
use crate::domain::session::AnalysisSession;
use crate::infrastructure::python_runner::{AnalysisExecutor, RunOutcome};
use crate::infrastructure::storage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub outcome: RunOutcome,
    /// `None` when the process failed or wrote no result document
    pub result: Option<RobustnessResult>,
}

/// Runs the external analysis against a session's upload.
///
/// Every run writes the same result file, so runs are serialised.
pub struct AnalysisRunUseCase {
    executor: Arc<dyn AnalysisExecutor + Send + Sync>,
    result_file: PathBuf,
    run_lock: Mutex<()>,
}

impl AnalysisRunUseCase {
    pub fn new(executor: Arc<dyn AnalysisExecutor + Send + Sync>, result_file: PathBuf) -> Self {
        Self {
            executor,
            result_file,
            run_lock: Mutex::new(()),
        }
    }

    pub fn result_file(&self) -> &PathBuf {
        &self.result_file
    }

    pub async fn execute(&self, session: &mut AnalysisSession, target: String) -> Result<AnalysisRun> {
        if !session.is_candidate(&target) {
            warn!(
                session_id = %session.id,
                target = %target,
                "Target is not an inferred numeric column, running anyway"
            );
        }
        session.select_target(target.clone());

        let _guard = self.run_lock.lock().await;
        storage::clear_result(&self.result_file).await?;

        let outcome = self.executor.run(&session.file_path, &target).await?;
        let result = if outcome.is_success() {
            storage::read_result(&self.result_file)
                .await?
                .map(|result| match result.target_detected {
                    Some(_) => result,
                    None => result.with_target(target.clone()),
                })
        } else {
            None
        };

        if let Some(result) = &result {
            session.record_result(result.clone());
        }

        info!(
            session_id = %session.id,
            target = %target,
            outcome = ?outcome,
            has_result = result.is_some(),
            "Analysis run finished"
        );
        Ok(AnalysisRun { outcome, result })
    }
}
