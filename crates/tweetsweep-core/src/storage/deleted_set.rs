use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::write_replacing;
use crate::{Error, Result};

/// Ids of every tweet confirmed deleted by any run. Only ever grows.
pub type DeletedSet = BTreeSet<String>;

/// Flat JSON-array file holding the deleted-set
#[derive(Debug, Clone)]
pub struct DeletedSetStore {
    path: PathBuf,
}

impl DeletedSetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted set. A missing file is an empty set; an unreadable one
    /// is `Error::StateCorrupted`, since guessing would risk re-deleting.
    pub fn load(&self) -> Result<DeletedSet> {
        if !self.path.exists() {
            tracing::debug!("No deleted-set at {}, starting empty", self.path.display());
            return Ok(DeletedSet::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let ids: Vec<String> =
            serde_json::from_str(&content).map_err(|e| Error::StateCorrupted {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(ids.into_iter().collect())
    }

    /// Replace the persisted set with `ids`
    pub fn save(&self, ids: &DeletedSet) -> Result<()> {
        let content = serde_json::to_vec(ids)?;
        write_replacing(&self.path, &content)?;
        tracing::debug!("Saved {} deleted tweet ids", ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = DeletedSetStore::new(dir.path().join("deleted_tweets.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deleted_tweets.json");
        std::fs::write(&path, "{\"not\": \"an array\"").unwrap();

        let err = DeletedSetStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::StateCorrupted { .. }));
    }

    #[test]
    fn test_reads_unsorted_legacy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deleted_tweets.json");
        std::fs::write(&path, r#"["30", "10", "20", "10"]"#).unwrap();

        let ids = DeletedSetStore::new(&path).load().unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["10", "20", "30"]);
    }

    #[test]
    fn test_save_replaces_contents() {
        let dir = tempdir().unwrap();
        let store = DeletedSetStore::new(dir.path().join("state").join("deleted_tweets.json"));

        store.save(&DeletedSet::from(["1".to_string(), "2".to_string()])).unwrap();
        store.save(&DeletedSet::from(["3".to_string()])).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, r#"["3"]"#);
        assert!(!dir.path().join("state").join("deleted_tweets.json.tmp").exists());
    }

    #[test]
    fn test_save_empty_set() {
        let dir = tempdir().unwrap();
        let store = DeletedSetStore::new(dir.path().join("deleted_tweets.json"));

        store.save(&DeletedSet::new()).unwrap();

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().is_empty());
    }
}
