use anyhow::Result;

use tweetsweep_core::{
    api::TwitterClient,
    source::ApiSource,
    storage::{DeletedSetStore, FetchedCache},
    sweep::Sweeper,
    AppConfig, Credentials,
};

use super::{print_summary, sweep_options};

pub async fn run(config: &AppConfig, dry_run: bool) -> Result<()> {
    tracing::info!("Starting deletion run against the API");

    let credentials = Credentials::from_env()?;
    let client = TwitterClient::new(config, credentials)?;

    let store = DeletedSetStore::new(config.deleted_path());
    let cache = FetchedCache::new(config.fetched_path());
    let source = ApiSource::new(&client).with_cache(cache.clone());

    let summary = Sweeper::new(&store, &client, sweep_options(config, dry_run))
        .run(&source)
        .await?;

    if summary.deleted > 0 {
        if let Err(e) = store.load().and_then(|ids| cache.prune(&ids)) {
            tracing::warn!("Failed to prune fetched cache: {}", e);
        }
    }

    print_summary(&summary);
    Ok(())
}
