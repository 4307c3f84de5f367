use anyhow::Result;

use tweetsweep_core::{
    api::TwitterClient, source::ArchiveSource, storage::DeletedSetStore, sweep::Sweeper,
    AppConfig, Credentials,
};

use super::{print_summary, sweep_options};

pub async fn run(config: &AppConfig, dry_run: bool) -> Result<()> {
    let archive_path = config.archive_path();
    tracing::info!("Starting deletion run against archive {}", archive_path.display());

    let credentials = Credentials::from_env()?;
    let client = TwitterClient::new(config, credentials)?;

    let store = DeletedSetStore::new(config.deleted_path());
    let source = ArchiveSource::new(archive_path, config.archive.entry.clone());

    let summary = Sweeper::new(&store, &client, sweep_options(config, dry_run))
        .run(&source)
        .await?;

    print_summary(&summary);
    Ok(())
}
