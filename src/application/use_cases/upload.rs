use crate::domain::error::{AppError, Result};
use crate::domain::session::AnalysisSession;
use crate::infrastructure::csv::{ColumnInferencer, CsvParser};
use crate::infrastructure::storage;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

pub struct UploadUseCase {
    inferencer: ColumnInferencer,
    upload_dir: PathBuf,
}

impl UploadUseCase {
    pub fn new(inferencer: ColumnInferencer, upload_dir: PathBuf) -> Self {
        Self {
            inferencer,
            upload_dir,
        }
    }

    pub fn is_csv_name(file_name: &str) -> bool {
        file_name.to_ascii_lowercase().ends_with(".csv")
    }

    /// Stores the upload and opens a session offering its numeric columns.
    pub async fn ingest(&self, file_name: &str, bytes: &[u8]) -> Result<AnalysisSession> {
        if !Self::is_csv_name(file_name) {
            return Err(AppError::ValidationError(
                "Only CSV files are supported".to_string(),
            ));
        }

        let content = CsvParser::decode(bytes);
        let columns = self.inferencer.numeric_columns(&content);
        let path = storage::store_upload(&self.upload_dir, bytes).await?;

        let session = AnalysisSession::new(
            Uuid::new_v4().to_string(),
            file_name.to_string(),
            path,
            columns,
        );

        info!(
            session_id = %session.id,
            file_name,
            size = bytes.len(),
            columns = session.columns.len(),
            "Upload ingested"
        );
        Ok(session)
    }

    pub async fn discard(&self, session: &AnalysisSession) -> Result<()> {
        storage::remove_upload(&session.file_path).await?;
        info!(session_id = %session.id, "Upload discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn use_case(dir: &std::path::Path) -> UploadUseCase {
        UploadUseCase::new(ColumnInferencer::default(), dir.join("uploads"))
    }

    #[test]
    fn test_csv_name_check() {
        assert!(UploadUseCase::is_csv_name("data.csv"));
        assert!(UploadUseCase::is_csv_name("DATA.CSV"));
        assert!(!UploadUseCase::is_csv_name("data.xlsx"));
        assert!(!UploadUseCase::is_csv_name("csv"));
    }

    #[tokio::test]
    async fn test_ingest_infers_columns_and_stores_file() {
        let dir = tempfile::tempdir().unwrap();
        let uc = use_case(dir.path());

        let session = uc
            .ingest("houses.csv", b"price,city,rooms\n100,Oslo,3\n250.5,Bergen,4\n")
            .await
            .unwrap();

        assert_eq!(session.file_name, "houses.csv");
        assert_eq!(session.columns, vec!["price", "rooms"]);
        assert!(session.target.is_none());
        assert!(session.file_path.exists());
    }

    #[tokio::test]
    async fn test_ingest_windows_1252_upload() {
        let dir = tempfile::tempdir().unwrap();
        let uc = use_case(dir.path());

        // 0xE9 is "é" in Windows-1252 and invalid on its own in UTF-8
        let bytes = b"caf\xe9,score\nx,1\ny,2\n";
        let session = uc.ingest("menu.csv", bytes).await.unwrap();
        assert_eq!(session.columns, vec!["score"]);
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_csv() {
        let dir = tempfile::tempdir().unwrap();
        let uc = use_case(dir.path());

        let err = uc.ingest("report.pdf", b"a,b\n1,2\n").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg == "Only CSV files are supported"));
    }

    #[tokio::test]
    async fn test_discard_removes_upload() {
        let dir = tempfile::tempdir().unwrap();
        let uc = use_case(dir.path());

        let session = uc.ingest("a.csv", b"a\n1\n").await.unwrap();
        uc.discard(&session).await.unwrap();
        assert!(!session.file_path.exists());
    }
}
