use super::{Candidate, CandidateSource};
use crate::api::{Tweet, TwitterClient};
use crate::storage::FetchedCache;
use crate::Result;

/// Candidates from the live timeline, oldest first
pub struct ApiSource<'a> {
    client: &'a TwitterClient,
    cache: Option<FetchedCache>,
}

impl<'a> ApiSource<'a> {
    pub fn new(client: &'a TwitterClient) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    /// Also write every fetched page to `cache`
    pub fn with_cache(mut self, cache: FetchedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve the acting user's id; `None` means the run cannot proceed
    pub async fn authenticate(&self) -> Option<String> {
        tracing::info!("Looking up user id...");
        match self.client.get_user_id().await {
            Ok(user_id) => {
                tracing::info!("Authenticated as user {}", user_id);
                Some(user_id)
            }
            Err(e) => {
                tracing::error!("Failed to get user id: {}", e);
                None
            }
        }
    }

    /// Most recent tweets of `user_id`, sorted oldest first. Failures yield an empty list.
    pub async fn fetch(&self, user_id: &str) -> Vec<Candidate> {
        tracing::info!("Fetching latest tweets...");
        let tweets = match self.client.fetch_user_tweets(user_id).await {
            Ok(tweets) => tweets,
            Err(e) => {
                tracing::error!("Failed to fetch tweets: {}", e);
                return Vec::new();
            }
        };

        log_range(&tweets);

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&tweets) {
                tracing::warn!("Failed to cache fetched tweets: {}", e);
            }
        }

        let mut candidates: Vec<Candidate> = tweets
            .into_iter()
            .map(|tweet| Candidate {
                id: tweet.id,
                created_at: tweet.created_at,
            })
            .collect();
        sort_oldest_first(&mut candidates);
        candidates
    }
}

#[async_trait::async_trait]
impl<'a> CandidateSource for ApiSource<'a> {
    fn name(&self) -> &str {
        "api"
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let Some(user_id) = self.authenticate().await else {
            tracing::error!("Cannot continue without a user id");
            return Ok(Vec::new());
        };

        Ok(self.fetch(&user_id).await)
    }
}

/// Stable ascending sort by creation time; undated candidates go first
pub fn sort_oldest_first(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

fn log_range(tweets: &[Tweet]) {
    let oldest = tweets.iter().filter_map(|t| t.created_at).min();
    let newest = tweets.iter().filter_map(|t| t.created_at).max();

    match (oldest, newest) {
        (Some(oldest), Some(newest)) => tracing::info!(
            "Fetched {} tweets ({} to {})",
            tweets.len(),
            oldest.to_rfc3339(),
            newest.to_rfc3339()
        ),
        _ if tweets.is_empty() => tracing::info!("No tweets found"),
        _ => tracing::info!("Fetched {} tweets", tweets.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dated(id: &str, secs: i64) -> Candidate {
        Candidate {
            id: id.to_string(),
            created_at: Some(Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    #[test]
    fn test_sort_oldest_first() {
        let mut candidates = vec![dated("c", 300), dated("a", 100), dated("b", 200)];
        sort_oldest_first(&mut candidates);

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_times() {
        let mut candidates = vec![dated("x", 100), dated("y", 100), Candidate::new("undated")];
        sort_oldest_first(&mut candidates);

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["undated", "x", "y"]);
    }
}
