use crate::domain::error::{AppError, Result};
use crate::domain::robustness::RobustnessResult;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Persist an uploaded CSV under a random name inside `upload_dir`.
pub async fn store_upload(upload_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(format!("{}.csv", Uuid::new_v4()));
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        AppError::IoError(format!("Failed to store upload {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), size = bytes.len(), "Stored upload");
    Ok(path)
}

pub async fn remove_upload(path: &Path) -> Result<()> {
    remove_if_exists(path).await
}

/// Drops a stale result document so a failed run cannot surface it.
pub async fn clear_result(path: &Path) -> Result<()> {
    remove_if_exists(path).await
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Raw result document, `None` when no analysis has written one yet.
pub async fn read_result_raw(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::IoError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

pub async fn read_result(path: &Path) -> Result<Option<RobustnessResult>> {
    match read_result_raw(path).await? {
        Some(content) => {
            let result = serde_json::from_str(&content).map_err(|e| {
                AppError::ParseError(format!("Invalid result file {}: {}", path.display(), e))
            })?;
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::robustness::AnalysisStatus;

    #[tokio::test]
    async fn test_missing_result_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_result(&dir.path().join("analysis.json")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_read_result_parses_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, r#"{"status":"error","reason":"bad target"}"#).unwrap();

        let result = read_result(&path).await.unwrap().unwrap();
        assert_eq!(result.status, AnalysisStatus::Error);
        assert_eq!(result.failure_reason(), "bad target");
    }

    #[tokio::test]
    async fn test_corrupt_result_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_result(&path).await,
            Err(AppError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_store_and_remove_upload() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");

        let path = store_upload(&uploads, b"a,b\n1,2\n").await.unwrap();
        assert!(path.starts_with(&uploads));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");

        remove_upload(&path).await.unwrap();
        assert!(!path.exists());
        // Removing twice is fine
        remove_upload(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, "{}").unwrap();

        clear_result(&path).await.unwrap();
        assert!(read_result_raw(&path).await.unwrap().is_none());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
