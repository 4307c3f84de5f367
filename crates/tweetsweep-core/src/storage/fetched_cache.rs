use std::path::{Path, PathBuf};

use super::{write_replacing, DeletedSet};
use crate::api::Tweet;
use crate::Result;

/// Last page fetched from the timeline, kept for inspection between runs.
/// Nothing reads it back into a sweep.
#[derive(Debug, Clone)]
pub struct FetchedCache {
    path: PathBuf,
}

impl FetchedCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached tweets; a missing or unreadable cache is empty
    pub fn load(&self) -> Vec<Tweet> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read fetched cache {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable fetched cache {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    pub fn save(&self, tweets: &[Tweet]) -> Result<()> {
        let content = serde_json::to_vec(tweets)?;
        write_replacing(&self.path, &content)?;
        tracing::debug!("Cached {} fetched tweets", tweets.len());
        Ok(())
    }

    /// Drop cached tweets that are already deleted. Returns how many were dropped.
    pub fn prune(&self, deleted: &DeletedSet) -> Result<usize> {
        let tweets = self.load();
        let before = tweets.len();
        let remaining: Vec<Tweet> = tweets
            .into_iter()
            .filter(|tweet| !deleted.contains(&tweet.id))
            .collect();

        let removed = before - remaining.len();
        if removed > 0 {
            self.save(&remaining)?;
            tracing::info!("Removed {} deleted tweets from cache ({} → {})", removed, before, remaining.len());
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tweet(id: &str) -> Tweet {
        Tweet {
            id: id.to_string(),
            created_at: None,
            text: None,
        }
    }

    #[test]
    fn test_prune_removes_deleted() {
        let dir = tempdir().unwrap();
        let cache = FetchedCache::new(dir.path().join("fetched_tweets.json"));
        cache.save(&[tweet("1"), tweet("2"), tweet("3")]).unwrap();

        let deleted = DeletedSet::from(["2".to_string(), "9".to_string()]);
        assert_eq!(cache.prune(&deleted).unwrap(), 1);

        let ids: Vec<String> = cache.load().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_unreadable_cache_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fetched_tweets.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FetchedCache::new(&path).load().is_empty());
    }
}
