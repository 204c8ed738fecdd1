use crate::analyzer::{AnalysisPoll, DocumentAnalyzer, DocumentLocation};
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Analyzer backed by saved analysis results on disk.
///
/// A document `bucket/key` is answered by `<root>/<bucket>/<key>.json`, falling back to
/// `<root>/<key>.json`. The job id is the resolved path, and every job finishes on the
/// first poll.
#[derive(Debug, Clone)]
pub struct LocalAnalyzer {
    root: PathBuf,
}

impl LocalAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, location: &DocumentLocation) -> Result<Vec<PathBuf>> {
        let file = format!("{}.json", location.key);
        let relative = Path::new(&file);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AnalysisError::provider(format!(
                "document key {:?} must be a relative path",
                location.key
            )));
        }

        let mut paths = Vec::with_capacity(2);
        if !location.bucket.is_empty() {
            paths.push(self.root.join(&location.bucket).join(relative));
        }
        paths.push(self.root.join(relative));
        Ok(paths)
    }
}

#[async_trait]
impl DocumentAnalyzer for LocalAnalyzer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn start_analysis(&self, location: &DocumentLocation) -> Result<String> {
        for path in self.candidates(location)? {
            if tokio::fs::try_exists(&path).await? {
                return Ok(path.to_string_lossy().into_owned());
            }
        }
        Err(AnalysisError::provider(format!(
            "no saved analysis for {location} under {}",
            self.root.display()
        )))
    }

    async fn poll_analysis(&self, job_id: &str) -> Result<AnalysisPoll> {
        let data = tokio::fs::read_to_string(job_id).await?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::JobStatus;
    use tempfile::TempDir;

    #[tokio::test]
    async fn prefers_bucket_directory_then_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("forms-bucket")).unwrap();
        std::fs::write(
            dir.path().join("forms-bucket").join("permit.pdf.json"),
            r#"{"JobStatus": "SUCCEEDED", "Blocks": []}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("other.pdf.json"), r#"{"Blocks": []}"#).unwrap();

        let analyzer = LocalAnalyzer::new(dir.path());
        let job = analyzer
            .start_analysis(&DocumentLocation::new("forms-bucket", "permit.pdf"))
            .await
            .unwrap();
        assert!(job.contains("forms-bucket"));

        let job = analyzer
            .start_analysis(&DocumentLocation::new("forms-bucket", "other.pdf"))
            .await
            .unwrap();
        let poll = analyzer.poll_analysis(&job).await.unwrap();
        assert_eq!(poll.status, JobStatus::Succeeded);
    }

    #[tokio::test]
    async fn rejects_escaping_keys_and_missing_documents() {
        let dir = TempDir::new().unwrap();
        let analyzer = LocalAnalyzer::new(dir.path());

        let err = analyzer
            .start_analysis(&DocumentLocation::new("b", "../secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(_)));

        let err = analyzer
            .start_analysis(&DocumentLocation::new("b", "absent.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no saved analysis"));
    }
}
