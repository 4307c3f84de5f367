mod api;
mod archive;

pub use api::{sort_oldest_first, ApiSource};
pub use archive::{extract_tweet_ids, parse_tweets_payload, ArchiveSource};

use chrono::{DateTime, Utc};

use crate::Result;

/// A tweet eligible for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    /// Creation time when the source knows it; archives don't
    pub created_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
        }
    }
}

/// Where a run gets its candidates from.
///
/// Expected "nothing to do" conditions (rate limits, identity lookup failures)
/// come back as an empty list. `Err` is reserved for conditions that must abort
/// the run, such as an unreadable archive.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short label used in log lines
    fn name(&self) -> &str;

    /// Candidates in processing order
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>>;
}
