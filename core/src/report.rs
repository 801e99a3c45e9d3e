use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::summary::RunSummary;

/// Persists a [`RunSummary`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort: the caller decides what a failure means for the run.
    pub async fn save(&self, summary: &RunSummary) -> Result<PathBuf, ReportError> {
        let body = serde_json::to_vec_pretty(summary).map_err(ReportError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ReportError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| ReportError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.path.clone())
    }
}
