mod sweeper;

pub use sweeper::{RunSummary, SweepOptions, Sweeper};

/// Remote delete-by-id
#[async_trait::async_trait]
pub trait Deleter: Send + Sync {
    /// `true` only when the remote side confirmed the deletion.
    /// Failures are logged by the implementation and never raised.
    async fn delete(&self, id: &str) -> bool;
}
