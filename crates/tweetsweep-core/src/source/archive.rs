use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{Candidate, CandidateSource};
use crate::{Error, Result};

/// Candidates from a downloaded account archive, in archive order
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    path: PathBuf,
    entry: String,
}

impl ArchiveSource {
    pub fn new(path: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry: entry.into(),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for ArchiveSource {
    fn name(&self) -> &str {
        "archive"
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        tracing::info!("Reading tweet ids from {}", self.path.display());

        let path = self.path.clone();
        let entry = self.entry.clone();
        let ids = tokio::task::spawn_blocking(move || extract_tweet_ids(&path, &entry))
            .await
            .map_err(|e| Error::Other(format!("Archive task failed: {}", e)))??;

        tracing::info!("Found {} tweet ids in archive", ids.len());
        Ok(ids.into_iter().map(Candidate::new).collect())
    }
}

/// Read `entry` from the zip at `path` and pull the tweet ids out of it
pub fn extract_tweet_ids(path: &Path, entry: &str) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| {
        Error::Archive(format!("Archive {} not found or unreadable: {}", path.display(), e))
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| {
        Error::Archive(format!("Archive {} is not a valid zip: {}", path.display(), e))
    })?;

    let mut inner = archive.by_name(entry).map_err(|e| match e {
        ZipError::FileNotFound => Error::Archive(format!(
            "Archive {} is missing expected file {}",
            path.display(),
            entry
        )),
        other => Error::Archive(format!("Failed reading {} from archive: {}", entry, other)),
    })?;

    let mut content = String::new();
    inner
        .read_to_string(&mut content)
        .map_err(|e| Error::Archive(format!("Failed reading {} from archive: {}", entry, e)))?;

    parse_tweets_payload(&content)
}

/// Parse the archive's tweets file: a JS assignment whose right-hand side is a JSON array.
///
/// Everything before the first `[` is discarded. Elements carry their id either at the
/// top level or under a `tweet` object; elements without one are skipped.
pub fn parse_tweets_payload(content: &str) -> Result<Vec<String>> {
    let start = content
        .find('[')
        .ok_or_else(|| Error::Archive("Tweets file contains no JSON array".to_string()))?;

    let items: Vec<Value> = serde_json::from_str(&content[start..])
        .map_err(|e| Error::Archive(format!("Tweets file is not a JSON array: {}", e)))?;

    let total = items.len();
    let ids: Vec<String> = items.iter().filter_map(tweet_id).collect();

    if ids.len() < total {
        tracing::debug!("Skipped {} archive entries without an id", total - ids.len());
    }

    Ok(ids)
}

fn tweet_id(item: &Value) -> Option<String> {
    id_field(item).or_else(|| item.get("tweet").and_then(id_field))
}

fn id_field(value: &Value) -> Option<String> {
    ["id", "id_str"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
