use crate::domain::error::{AppError, Result};
use crate::domain::robustness::RobustnessResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-upload state: the stored file, its inferred columns and the last
/// analysis run against it. Owned by the caller and passed into each step.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    pub id: String,
    pub file_name: String,
    #[serde(skip)]
    pub file_path: PathBuf,
    pub columns: Vec<String>,
    pub target: Option<String>,
    pub last_result: Option<RobustnessResult>,
    pub created_at: i64,
}

impl AnalysisSession {
    pub fn new(id: String, file_name: String, file_path: PathBuf, columns: Vec<String>) -> Self {
        Self {
            id,
            file_name,
            file_path,
            columns,
            target: None,
            last_result: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Selecting a new target invalidates the previous result.
    pub fn select_target(&mut self, target: String) {
        if self.target.as_deref() != Some(target.as_str()) {
            self.last_result = None;
        }
        self.target = Some(target);
    }

    pub fn record_result(&mut self, result: RobustnessResult) {
        self.last_result = Some(result);
    }

    pub fn is_candidate(&self, target: &str) -> bool {
        self.columns.iter().any(|column| column == target)
    }
}

/// Trims a user-supplied target column and rejects placeholder values
/// a browser form sends when nothing was selected.
pub fn normalize_target(raw: Option<&str>) -> Result<String> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    let lowered = trimmed.to_ascii_lowercase();
    if trimmed.is_empty() || lowered == "null" || lowered == "none" || lowered == "undefined" {
        return Err(AppError::ValidationError(
            "Target column is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AnalysisSession {
        AnalysisSession::new(
            "s1".to_string(),
            "houses.csv".to_string(),
            PathBuf::from("/tmp/houses.csv"),
            vec!["rooms".to_string(), "price".to_string()],
        )
    }

    #[test]
    fn test_changing_target_clears_result() {
        let mut session = session();
        session.select_target("price".to_string());
        session.record_result(RobustnessResult::success(90.0, 90.0, 90.0, 90.0));

        session.select_target("price".to_string());
        assert!(session.last_result.is_some());

        session.select_target("rooms".to_string());
        assert!(session.last_result.is_none());
        assert_eq!(session.target.as_deref(), Some("rooms"));
    }

    #[test]
    fn test_is_candidate() {
        let session = session();
        assert!(session.is_candidate("price"));
        assert!(!session.is_candidate("Price"));
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target(Some("  price ")).unwrap(), "price");
        assert!(normalize_target(None).is_err());
        assert!(normalize_target(Some("")).is_err());
        assert!(normalize_target(Some("null")).is_err());
        assert!(normalize_target(Some("None")).is_err());
    }
}
