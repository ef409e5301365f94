mod application;
mod domain;
mod infrastructure;
mod interfaces;

use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::llm_clients::{GeminiClient, LLMClient};
use crate::infrastructure::python_runner::{AnalysisExecutor, PythonRunner};
use crate::infrastructure::storage::ensure_dir;
use crate::interfaces::http::{start_server, HttpState};
use actix_web::web;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub fn run() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = ConfigService::load()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    ensure_dir(&config.paths.upload_dir)?;
    ensure_dir(&config.paths.output_dir)?;

    let logs = ActivityLog::new();
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(GeminiClient::new());
    let executor: Arc<dyn AnalysisExecutor + Send + Sync> = Arc::new(PythonRunner::new(
        config.analysis.python.clone(),
        config.analysis.script.clone(),
        Duration::from_secs(config.analysis.timeout_secs),
        logs.clone(),
    ));

    let state = web::Data::new(HttpState::new(config, llm_client, executor, logs));

    actix_web::rt::System::new().block_on(async move { start_server(state)?.await })
}
