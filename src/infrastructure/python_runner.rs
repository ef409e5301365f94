//! Python runner (Rust -> external robustness script)
use crate::domain::error::{AppError, Result};
use crate::infrastructure::activity_log::ActivityLog;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

const SOURCE: &str = "Analysis";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed { exit_code: Option<i32> },
    TimedOut { after_secs: u64 },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Runs the external analysis for one CSV and target column.
///
/// The result document is written by the process itself; an `Err` means
/// the process could not be started at all.
#[async_trait]
pub trait AnalysisExecutor {
    async fn run(&self, csv_path: &Path, target: &str) -> Result<RunOutcome>;
}

pub struct PythonRunner {
    python: String,
    script: PathBuf,
    timeout: Duration,
    log: ActivityLog,
}

impl PythonRunner {
    pub fn new(
        python: impl Into<String>,
        script: impl Into<PathBuf>,
        timeout: Duration,
        log: ActivityLog,
    ) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
            timeout,
            log,
        }
    }
}

#[async_trait]
impl AnalysisExecutor for PythonRunner {
    async fn run(&self, csv_path: &Path, target: &str) -> Result<RunOutcome> {
        self.log.info(
            SOURCE,
            &format!(
                "Starting analysis: {} -> Target: \"{}\"",
                csv_path.display(),
                target
            ),
        );

        let mut child = Command::new(&self.python)
            .arg(&self.script)
            .arg(csv_path)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                self.log
                    .error(SOURCE, &format!("Failed to spawn {}: {}", self.python, e));
                AppError::ProcessError(format!("Failed to spawn {}: {}", self.python, e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::ProcessError("Analysis stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::ProcessError("Analysis stderr unavailable".to_string()))?;

        let stdout_task = tokio::spawn(forward_lines(stdout, self.log.clone(), false));
        let stderr_task = tokio::spawn(forward_lines(stderr, self.log.clone(), true));

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                let after_secs = self.timeout.as_secs();
                self.log.error(
                    SOURCE,
                    &format!("Analysis timed out after {}s, process killed", after_secs),
                );
                return Ok(RunOutcome::TimedOut { after_secs });
            }
        };

        // Drain remaining output before reporting
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        if status.success() {
            self.log.info(SOURCE, "Analysis finished with code 0");
            Ok(RunOutcome::Completed)
        } else {
            let exit_code = status.code();
            self.log.error(
                SOURCE,
                &format!("Analysis failed with code {:?}", exit_code),
            );
            Ok(RunOutcome::Failed { exit_code })
        }
    }
}

async fn forward_lines<R>(reader: R, log: ActivityLog, is_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        if is_stderr {
            log.warn("Python", &line);
        } else {
            log.info("Python", &line);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("tester.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_successful_run_forwards_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = script(dir.path(), "echo \"analysing $1 for $2\"\necho oops >&2\nexit 0\n");
        let log = ActivityLog::new();
        let runner = PythonRunner::new("sh", script, Duration::from_secs(10), log.clone());

        let outcome = runner.run(Path::new("data.csv"), "price").await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let entries = log.entries();
        assert!(entries
            .iter()
            .any(|e| e.source == "Python" && e.message == "analysing data.csv for price"));
        assert!(entries
            .iter()
            .any(|e| e.level == "WARN" && e.message == "oops"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = script(dir.path(), "exit 3\n");
        let runner = PythonRunner::new("sh", script, Duration::from_secs(10), ActivityLog::new());

        let outcome = runner.run(Path::new("data.csv"), "price").await.unwrap();
        assert_eq!(outcome, RunOutcome::Failed { exit_code: Some(3) });
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_spawn_error() {
        let runner = PythonRunner::new(
            "definitely-not-an-interpreter",
            "tester.py",
            Duration::from_secs(10),
            ActivityLog::new(),
        );

        let result = runner.run(Path::new("data.csv"), "price").await;
        assert!(matches!(result, Err(AppError::ProcessError(_))));
    }

    #[tokio::test]
    async fn test_slow_run_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let script = script(dir.path(), "sleep 5\n");
        let runner = PythonRunner::new("sh", script, Duration::from_millis(200), ActivityLog::new());

        let outcome = runner.run(Path::new("data.csv"), "price").await.unwrap();
        assert!(matches!(outcome, RunOutcome::TimedOut { .. }));
    }
}
