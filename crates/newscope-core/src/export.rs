//! JSON export side-channel for collected result sets.
//!
//! One file per `(source, keyword, run)` under
//! `<export_dir>/search/<source>/<keyword>_<YYYYMMDD_HHMMSS>.json`, written
//! for offline inspection. The pipeline never reads these files back.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Article;

/// Errors produced while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write export file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize export record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The on-disk record: query context plus the ordered result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub keyword: String,
    pub source: String,
    /// Run timestamp, `YYYYMMDD_HHMMSS`, matching the file name.
    pub timestamp: String,
    pub total_count: usize,
    pub results: Vec<Article>,
}

/// Writes one source's search results to a timestamped JSON file and returns
/// the path written.
///
/// # Errors
///
/// Returns [`ExportError`] when the directory cannot be created, the record
/// cannot be serialized, or the file cannot be written.
pub fn export_search_results(
    export_dir: &Path,
    keyword: &str,
    source: &str,
    results: &[Article],
) -> Result<PathBuf, ExportError> {
    export_search_results_at(export_dir, keyword, source, results, Utc::now())
}

/// Timestamp-injectable body of [`export_search_results`].
fn export_search_results_at(
    export_dir: &Path,
    keyword: &str,
    source: &str,
    results: &[Article],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let dir = export_dir.join("search").join(source);
    fs::create_dir_all(&dir).map_err(|e| ExportError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;

    let timestamp = now.format("%Y%m%d_%H%M%S").to_string();
    let safe_keyword = keyword.replace(char::is_whitespace, "_");
    let path = dir.join(format!("{safe_keyword}_{timestamp}.json"));

    let record = ExportRecord {
        keyword: keyword.to_string(),
        source: source.to_string(),
        timestamp,
        total_count: results.len(),
        results: results.to_vec(),
    };

    let body = serde_json::to_string_pretty(&record)?;
    fs::write(&path, body).map_err(|e| ExportError::Write {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(
        source = source,
        keyword = keyword,
        count = record.total_count,
        path = %path.display(),
        "exported search results"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::types::ArticleBody;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("newscope-export-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_article(url: &str) -> Article {
        Article::new(
            "naver",
            "title".to_string(),
            url.to_string(),
            ArticleBody::Extracted("body".to_string()),
        )
    }

    #[test]
    fn export_writes_record_that_round_trips() {
        let dir = scratch_dir("roundtrip");
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let articles = vec![sample_article("https://example.com/1")];

        let path =
            export_search_results_at(&dir, "HBM3E supply", "naver", &articles, now).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "HBM3E_supply_20250301_093000.json"
        );

        let raw = fs::read_to_string(&path).unwrap();
        let record: ExportRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.keyword, "HBM3E supply");
        assert_eq!(record.source, "naver");
        assert_eq!(record.total_count, 1);
        assert_eq!(record.results[0].url, "https://example.com/1");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_creates_per_source_directories() {
        let dir = scratch_dir("dirs");
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();

        let path = export_search_results_at(&dir, "hbm", "sk_hynix", &[], now).unwrap();
        assert!(path.starts_with(dir.join("search").join("sk_hynix")));

        let record: ExportRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(record.total_count, 0);
        assert!(record.results.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
