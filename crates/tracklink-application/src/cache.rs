// SPDX-License-Identifier: GPL-3.0-or-later

//! Process-lifetime memoization of resolution outcomes.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracklink_domain::Platform;

/// Outcome stored for a resolved key. `NoMatch` is an explicit negative
/// entry: the resolution ran to completion and found nothing, which is
/// distinct from a key that has never been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Match(String),
    NoMatch,
}

/// In-memory cache keyed by `(source platform, source id)`.
///
/// Entries live until process termination; there is no eviction or TTL.
/// Writes are whole-value replacements, so concurrent resolutions of the
/// same key settle on last-write-wins without a read-modify-write hazard.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: Arc<Mutex<HashMap<(Platform, String), CacheEntry>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, platform: Platform, track_id: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .await
            .get(&(platform, track_id.to_string()))
            .cloned()
    }

    pub async fn insert(&self, platform: Platform, track_id: &str, entry: CacheEntry) {
        self.entries
            .lock()
            .await
            .insert((platform, track_id.to_string()), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_key_is_none() {
        let cache = ResolutionCache::new();
        assert_eq!(cache.get(Platform::Spotify, "abc").await, None);
    }

    #[tokio::test]
    async fn stores_positive_and_negative_entries() {
        let cache = ResolutionCache::new();

        cache
            .insert(
                Platform::Spotify,
                "abc",
                CacheEntry::Match("1445903620".to_string()),
            )
            .await;
        cache
            .insert(Platform::AppleMusic, "1445903620", CacheEntry::NoMatch)
            .await;

        assert_eq!(
            cache.get(Platform::Spotify, "abc").await,
            Some(CacheEntry::Match("1445903620".to_string()))
        );
        assert_eq!(
            cache.get(Platform::AppleMusic, "1445903620").await,
            Some(CacheEntry::NoMatch)
        );
    }

    #[tokio::test]
    async fn keys_are_scoped_by_platform() {
        let cache = ResolutionCache::new();

        cache
            .insert(Platform::Spotify, "shared-id", CacheEntry::NoMatch)
            .await;

        assert_eq!(cache.get(Platform::AppleMusic, "shared-id").await, None);
    }

    #[tokio::test]
    async fn later_write_replaces_earlier() {
        let cache = ResolutionCache::new();

        cache
            .insert(Platform::Spotify, "abc", CacheEntry::NoMatch)
            .await;
        cache
            .insert(
                Platform::Spotify,
                "abc",
                CacheEntry::Match("xyz".to_string()),
            )
            .await;

        assert_eq!(
            cache.get(Platform::Spotify, "abc").await,
            Some(CacheEntry::Match("xyz".to_string()))
        );
    }
}
