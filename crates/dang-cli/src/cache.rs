//! The GraphQL schema cache (spec.md §6's "Persisted state"): an opaque
//! path under the user cache dir, invalidated only by `--clear-cache`.
//! Schema introspection itself is an external collaborator (spec.md §1),
//! so this module only knows the cache's location and how to delete it.

use std::path::PathBuf;

pub fn schema_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("dang").join("schema"))
}

/// Deletes the schema cache directory if it exists. A missing cache is not
/// an error — `--clear-cache` on a fresh install is a no-op, not a failure.
pub fn clear_cache() -> std::io::Result<()> {
    let Some(dir) = schema_cache_dir() else {
        return Ok(());
    };
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    Ok(())
}
