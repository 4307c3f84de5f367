mod deleted_set;
mod fetched_cache;

pub use deleted_set::{DeletedSet, DeletedSetStore};
pub use fetched_cache::FetchedCache;

use std::path::Path;

/// Write `bytes` to a sibling temp file, then rename it over `path`
pub(crate) fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}
