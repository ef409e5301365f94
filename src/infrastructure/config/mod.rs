use crate::domain::csv::CsvDialect;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use validator::Validate;

pub const ENV_PREFIX: &str = "DATABUDDY_";
pub const CONFIG_PATH_VAR: &str = "DATABUDDY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "databuddy.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Largest accepted CSV upload, in bytes
    #[validate(range(min = 1))]
    pub upload_limit_bytes: usize,
    /// Sessions kept in memory; the oldest is evicted with its upload
    #[validate(range(min = 1))]
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            upload_limit_bytes: 50 * 1024 * 1024,
            max_sessions: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub frontend_dir: PathBuf,
    pub index_file: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Written by the analysis script, overwritten on every run
    pub result_file: PathBuf,
    /// File name of the chart inside `output_dir`
    pub chart_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            frontend_dir: PathBuf::from("frontend"),
            index_file: "Home_page.html".to_string(),
            upload_dir: PathBuf::from("backend/uploads"),
            output_dir: PathBuf::from("backend/output"),
            result_file: PathBuf::from("analysis.json"),
            chart_file: "stress_plot.png".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    #[validate(length(min = 1))]
    pub python: String,
    #[validate(length(min = 1))]
    pub script: String,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            script: "backend/integrated_tester.py".to_string(),
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub dialect: CsvDialect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub analysis: AnalysisConfig,
    pub narration: LLMConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .map_err(|e| AppError::ConfigError(format!("server: {}", e)))?;
        self.analysis
            .validate()
            .map_err(|e| AppError::ConfigError(format!("analysis: {}", e)))?;
        if self.paths.chart_file.trim().is_empty() {
            return Err(AppError::ConfigError(
                "paths: chart_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Plain `PORT` and provider key variables, as set by common hosting setups
    fn apply_compat_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::ConfigError(format!("PORT is not a valid port: {}", port)))?;
        }

        if !self.narration.has_api_key() {
            self.narration.api_key = lookup("GOOGLE_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .filter(|key| !key.trim().is_empty());
        }
        Ok(())
    }
}

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then the TOML file, then `DATABUDDY_*` variables
    /// (`__` separates nested keys, e.g. `DATABUDDY_SERVER__PORT`).
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<AppConfig> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<AppConfig> {
        let mut config: AppConfig = Self::figment(path).extract()?;
        config.apply_compat_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            config_file = %path.display(),
            port = config.server.port,
            dialect = %config.inference.dialect,
            tokenising = config.inference.dialect.description(),
            narration_key = config.narration.has_api_key(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
