// Tag-indexed read cache.
// Entries are stored as JSON values and dropped when any of their tags is revalidated.
// A load that overlaps a revalidation of one of its tags is returned but not stored.
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use super::error::AppError;

struct CacheEntry {
    value: serde_json::Value,
    tags: HashSet<String>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped on every revalidation of a tag, whether or not entries were dropped.
    revisions: HashMap<String, u64>,
}

impl CacheState {
    fn revision_of(&self, tags: &[String]) -> Vec<u64> {
        tags.iter()
            .map(|t| self.revisions.get(t).copied().unwrap_or(0))
            .collect()
    }
}

#[derive(Default)]
pub struct TagCache {
    state: RwLock<CacheState>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let state = self.state.read().ok()?;
        let entry = state.entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn set<T: Serialize>(&self, key: &str, tags: &[String], value: &T) {
        self.store(key, tags, value, None);
    }

    /// Writes the entry unless one of `tags` was revalidated after `seen` was taken.
    /// Returns whether the entry was stored.
    fn store<T: Serialize>(
        &self,
        key: &str,
        tags: &[String],
        value: &T,
        seen: Option<&[u64]>,
    ) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("⚠️  Skipping cache write for {}: {}", key, e);
                return false;
            }
        };

        let Ok(mut state) = self.state.write() else {
            return false;
        };

        if let Some(seen) = seen {
            if state.revision_of(tags) != seen {
                log::debug!("⏭️  Dropping stale load for {} (revalidated while loading)", key);
                return false;
            }
        }

        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                tags: tags.iter().cloned().collect(),
            },
        );
        true
    }

    /// Returns the cached value for `key`, or runs `load` and caches its result
    /// under `tags`. Errors are never cached.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        tags: &[String],
        load: F,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            log::debug!("📦 Cache hit: {}", key);
            return Ok(hit);
        }

        let seen = self
            .state
            .read()
            .map(|state| state.revision_of(tags))
            .unwrap_or_default();

        let value = load().await?;
        if self.store(key, tags, &value, Some(&seen)) {
            log::debug!("💾 Cached {} (tags: {:?})", key, tags);
        }

        Ok(value)
    }

    /// Drops every entry carrying `tag`. Returns how many entries were removed.
    pub fn revalidate_tag(&self, tag: &str) -> usize {
        let Ok(mut state) = self.state.write() else {
            return 0;
        };

        *state.revisions.entry(tag.to_string()).or_insert(0) += 1;

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.tags.contains(tag));
        let removed = before - state.entries.len();

        if removed > 0 {
            log::debug!("🧹 Revalidated tag {} ({} entries)", tag, removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
