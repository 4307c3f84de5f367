use anyhow::Result;

use tweetsweep_core::{
    storage::{DeletedSetStore, FetchedCache},
    AppConfig,
};

pub fn run(config: &AppConfig) -> Result<()> {
    let store = DeletedSetStore::new(config.deleted_path());
    let deleted = store.load()?;
    let cached = FetchedCache::new(config.fetched_path()).load();

    println!("State file: {}", store.path().display());
    println!("  Tweets deleted so far: {}", deleted.len());
    println!("  Tweets in fetched cache: {}", cached.len());

    let pending = cached.iter().filter(|t| !deleted.contains(&t.id)).count();
    if pending > 0 {
        println!("  Cached tweets not yet deleted: {}", pending);
    }

    println!("  Deletions per run: {}", config.sweep.max_deletions);

    Ok(())
}
