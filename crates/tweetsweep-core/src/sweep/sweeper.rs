use std::fmt;
use std::time::Duration;

use super::Deleter;
use crate::config::SweepConfig;
use crate::source::CandidateSource;
use crate::storage::DeletedSetStore;
use crate::Result;

#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Successful deletions allowed in one run
    pub max_deletions: u32,
    /// Pause after each successful deletion
    pub delay: Duration,
    /// Report what would be deleted without deleting or saving
    pub dry_run: bool,
}

impl SweepOptions {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            max_deletions: config.max_deletions,
            delay: Duration::from_millis(config.delete_delay_ms),
            dry_run: false,
        }
    }
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub deleted: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Eligible candidates seen in dry-run mode
    pub would_delete: u32,
    /// The run stopped at `max_deletions` with candidates left over
    pub cap_reached: bool,
    /// Size of the deleted-set after the run
    pub total_deleted: usize,
}

impl RunSummary {
    /// Candidates examined before the run ended
    pub fn scanned(&self) -> u32 {
        self.deleted + self.skipped + self.failed + self.would_delete
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} skipped, {} failed, {} scanned",
            self.deleted,
            self.skipped,
            self.failed,
            self.scanned()
        )?;
        if self.would_delete > 0 {
            write!(f, ", {} would be deleted", self.would_delete)?;
        }
        Ok(())
    }
}

/// One bounded, sequential deletion pass over a candidate source
pub struct Sweeper<'a> {
    store: &'a DeletedSetStore,
    deleter: &'a dyn Deleter,
    options: SweepOptions,
}

impl<'a> Sweeper<'a> {
    pub fn new(store: &'a DeletedSetStore, deleter: &'a dyn Deleter, options: SweepOptions) -> Self {
        Self {
            store,
            deleter,
            options,
        }
    }

    /// Run the pass.
    ///
    /// The deleted-set is saved after every successful deletion and once more when
    /// the loop ends. A run whose source yields nothing leaves the state file untouched.
    pub async fn run(&self, source: &dyn CandidateSource) -> Result<RunSummary> {
        let mut deleted_ids = self.store.load()?;
        tracing::info!("{} previously deleted tweets loaded", deleted_ids.len());

        let candidates = source.fetch_candidates().await?;
        let mut summary = RunSummary::default();

        if candidates.is_empty() {
            tracing::info!("No tweets to process from {}", source.name());
            summary.total_deleted = deleted_ids.len();
            return Ok(summary);
        }

        let cap = self.options.max_deletions;

        for candidate in &candidates {
            if deleted_ids.contains(&candidate.id) {
                tracing::debug!("Tweet {} already deleted, skipping", candidate.id);
                summary.skipped += 1;
                continue;
            }

            if summary.deleted + summary.would_delete >= cap {
                tracing::info!("Deletion limit reached ({})", cap);
                summary.cap_reached = true;
                break;
            }

            if self.options.dry_run {
                tracing::info!("Would delete tweet {}", describe(candidate));
                summary.would_delete += 1;
                continue;
            }

            tracing::info!("Deleting tweet {}", describe(candidate));

            if !self.deleter.delete(&candidate.id).await {
                summary.failed += 1;
                continue;
            }

            deleted_ids.insert(candidate.id.clone());
            summary.deleted += 1;
            self.store.save(&deleted_ids)?;

            if summary.deleted < cap && !self.options.delay.is_zero() {
                tracing::debug!("Waiting {:?} before the next deletion", self.options.delay);
                tokio::time::sleep(self.options.delay).await;
            }
        }

        if !self.options.dry_run {
            self.store.save(&deleted_ids)?;
        }

        summary.total_deleted = deleted_ids.len();
        tracing::info!("Run finished: {}", summary);
        tracing::info!("Total tweets deleted: {}", summary.total_deleted);

        Ok(summary)
    }
}

fn describe(candidate: &crate::source::Candidate) -> String {
    match candidate.created_at {
        Some(created_at) => format!("{} from {}", candidate.id, created_at.to_rfc3339()),
        None => candidate.id.clone(),
    }
}
