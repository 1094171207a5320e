//! Cache command implementation.

use crate::cli::{CacheAction, Output};
use crate::config::Settings;
use crate::llm::{CompletionCache, SqliteCompletionCache};
use anyhow::Result;

/// Run the cache command.
pub async fn run_cache(action: &CacheAction, settings: Settings) -> Result<()> {
    let path = settings.cache_path(settings.llm.cache_seed);

    match action {
        CacheAction::Path => {
            println!("{}", path.display());
        }

        CacheAction::Clear => {
            if !path.exists() {
                Output::info("Cache is empty.");
                return Ok(());
            }
            let cache = SqliteCompletionCache::new(&path)?;
            let removed = cache.clear().await?;
            Output::success(&format!("Removed {} cached completion(s)", removed));
        }
    }

    Ok(())
}
