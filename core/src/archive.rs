use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveStatus {
    Archived(PathBuf),
    NothingToArchive,
    Failed(String),
}

impl ArchiveStatus {
    pub fn archived(&self) -> bool {
        matches!(self, ArchiveStatus::Archived(_))
    }
}

/// Copies output files aside before a step overwrites them.
#[derive(Debug, Clone)]
pub struct Archiver {
    archive_dir: PathBuf,
}

impl Archiver {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub async fn archive(&self, source: &Path) -> ArchiveStatus {
        self.archive_at(source, Local::now().naive_local()).await
    }

    /// Best-effort copy of `source` to `<archive_dir>/<stem>_<timestamp><.ext>`.
    pub async fn archive_at(&self, source: &Path, now: NaiveDateTime) -> ArchiveStatus {
        match tokio::fs::try_exists(source).await {
            Ok(true) => {}
            Ok(false) => return ArchiveStatus::NothingToArchive,
            Err(e) => return ArchiveStatus::Failed(e.to_string()),
        }

        let Some(name) = archived_file_name(source, now) else {
            return ArchiveStatus::Failed(format!("no file name in {}", source.display()));
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.archive_dir).await {
            return ArchiveStatus::Failed(format!(
                "create {}: {e}",
                self.archive_dir.display()
            ));
        }

        let destination = self.archive_dir.join(name);
        match tokio::fs::copy(source, &destination).await {
            Ok(_) => ArchiveStatus::Archived(destination),
            Err(e) => ArchiveStatus::Failed(e.to_string()),
        }
    }
}

/// `players.json` at 2025-03-01 12:30:05 becomes `players_20250301_123005.json`.
pub fn archived_file_name(source: &Path, now: NaiveDateTime) -> Option<String> {
    let stem = source.file_stem()?.to_string_lossy();
    let stamp = now.format(ARCHIVE_TIMESTAMP_FORMAT);
    Some(match source.extension() {
        Some(ext) => format!("{stem}_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{stamp}"),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn timestamp_goes_between_stem_and_extension() {
        let name = archived_file_name(Path::new("data/players.json"), at(12, 30, 5));
        assert_eq!(name.as_deref(), Some("players_20250301_123005.json"));

        let name = archived_file_name(Path::new("data/cache.tar.gz"), at(0, 0, 0));
        assert_eq!(name.as_deref(), Some("cache.tar_20250301_000000.gz"));

        let name = archived_file_name(Path::new("data/LOCK"), at(0, 0, 0));
        assert_eq!(name.as_deref(), Some("LOCK_20250301_000000"));
    }

    #[tokio::test]
    async fn missing_source_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let archive_dir = dir.path().join("archive");
        let archiver = Archiver::new(&archive_dir);

        let status = archiver.archive(&dir.path().join("absent.json")).await;
        assert_eq!(status, ArchiveStatus::NothingToArchive);
        assert!(!status.archived());
        assert!(!archive_dir.exists());
    }

    #[tokio::test]
    async fn copies_existing_file_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("standings.json");
        std::fs::write(&source, "[1,2,3]").unwrap();
        let archiver = Archiver::new(dir.path().join("archive"));

        let status = archiver.archive_at(&source, at(8, 15, 0)).await;
        let expected = dir.path().join("archive").join("standings_20250301_081500.json");
        assert_eq!(status, ArchiveStatus::Archived(expected.clone()));
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "[1,2,3]");
        assert!(source.exists());
    }

    #[tokio::test]
    async fn distinct_timestamps_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("form.json");
        std::fs::write(&source, "{}").unwrap();
        let archiver = Archiver::new(dir.path().join("archive"));

        assert!(archiver.archive_at(&source, at(1, 0, 0)).await.archived());
        assert!(archiver.archive_at(&source, at(1, 0, 1)).await.archived());
        let count = std::fs::read_dir(archiver.archive_dir()).unwrap().count();
        assert_eq!(count, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unwritable_archive_dir_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("xg.json");
        std::fs::write(&source, "[]").unwrap();
        // A regular file where the archive directory should be.
        let blocker = dir.path().join("archive");
        std::fs::write(&blocker, "").unwrap();

        let status = Archiver::new(&blocker).archive(&source).await;
        assert!(matches!(status, ArchiveStatus::Failed(_)));
    }
}
