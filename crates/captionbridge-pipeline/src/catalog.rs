//! Caption language catalog with a durable one-day cache.

use crate::traits::{Clock, LanguageSource};
use captionbridge_core::constants::{
    LANGUAGE_CACHE_KEY, LANGUAGE_CACHE_TIMESTAMP_KEY, LANGUAGE_CACHE_TTL_HOURS,
};
use captionbridge_core::{LanguageEntry, UploadError};
use captionbridge_storage::{KeyValueStore, LocalStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;

struct CachedCatalog {
    entries: Vec<LanguageEntry>,
    /// `None` when the age is unknown; such a cache is always stale.
    fetched_at: Option<DateTime<Utc>>,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let millis = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Language catalog backed by a remote source and a durable cache.
///
/// The cache is trusted for [`LANGUAGE_CACHE_TTL_HOURS`] after it was
/// fetched. A stale cache is only used when a refetch fails.
pub struct LanguageCatalog {
    source: Arc<dyn LanguageSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    entries: Vec<LanguageEntry>,
}

impl LanguageCatalog {
    pub fn new(
        source: Arc<dyn LanguageSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            entries: Vec::new(),
        }
    }

    /// Catalog cached on disk under `cache_dir`.
    pub async fn open(
        source: Arc<dyn LanguageSource>,
        cache_dir: &Path,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, UploadError> {
        let store = LocalStore::new(cache_dir)
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;
        Ok(Self::new(source, Arc::new(store), clock))
    }

    /// Load the catalog, fetching only when there is no fresh cache.
    pub async fn load(&mut self) -> Result<&[LanguageEntry], UploadError> {
        let cached = self.read_cache().await;
        let now = self.clock.now();

        if let Some(cache) = &cached {
            let fresh = cache
                .fetched_at
                .is_some_and(|at| now - at < Duration::hours(LANGUAGE_CACHE_TTL_HOURS));
            if fresh {
                tracing::debug!(
                    entries = cache.entries.len(),
                    fetched_at = ?cache.fetched_at,
                    "Using cached language catalog"
                );
                self.entries = cache.entries.clone();
                return Ok(&self.entries);
            }
        }

        self.fetch_or_fallback(cached).await
    }

    /// Fetch the catalog regardless of cache age.
    pub async fn refresh(&mut self) -> Result<&[LanguageEntry], UploadError> {
        let cached = self.read_cache().await;
        self.fetch_or_fallback(cached).await
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn find_by_code(&self, code: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Match the `"{name} ({code})"` rendering exactly.
    pub fn find_by_display(&self, text: &str) -> Option<&LanguageEntry> {
        self.entries
            .iter()
            .find(|entry| entry.display_name() == text)
    }

    async fn fetch_or_fallback(
        &mut self,
        cached: Option<CachedCatalog>,
    ) -> Result<&[LanguageEntry], UploadError> {
        match self.source.fetch_languages().await {
            Ok(entries) => {
                tracing::info!(entries = entries.len(), "Fetched language catalog");
                self.write_cache(&entries, self.clock.now()).await;
                self.entries = entries;
                Ok(&self.entries)
            }
            Err(err) => match cached {
                Some(cache) => {
                    tracing::warn!(
                        error = %err,
                        fetched_at = ?cache.fetched_at,
                        "Language catalog fetch failed, using stale cache"
                    );
                    self.entries = cache.entries;
                    Ok(&self.entries)
                }
                None => Err(UploadError::Catalog(err)),
            },
        }
    }

    /// Read the persisted cache. An unreadable payload counts as no cache;
    /// an unreadable timestamp leaves the entries with an unknown age.
    async fn read_cache(&self) -> Option<CachedCatalog> {
        let payload = match self.store.get(LANGUAGE_CACHE_KEY).await {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached language catalog");
                return None;
            }
        };
        let entries: Vec<LanguageEntry> = match serde_json::from_slice(&payload) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Cached language catalog is corrupt");
                return None;
            }
        };

        let timestamp = match self.store.get_string(LANGUAGE_CACHE_TIMESTAMP_KEY).await {
            Ok(timestamp) => timestamp,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read language catalog timestamp");
                None
            }
        };
        let fetched_at = timestamp.as_deref().and_then(parse_timestamp);
        if fetched_at.is_none() {
            tracing::debug!("Language catalog cache has no usable timestamp");
        }

        Some(CachedCatalog {
            entries,
            fetched_at,
        })
    }

    async fn write_cache(&self, entries: &[LanguageEntry], fetched_at: DateTime<Utc>) {
        let payload = match serde_json::to_vec(entries) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize language catalog");
                return;
            }
        };

        let stamp = fetched_at.timestamp_millis().to_string();
        let result = match self.store.put(LANGUAGE_CACHE_KEY, payload).await {
            Ok(()) => {
                self.store
                    .put_string(LANGUAGE_CACHE_TIMESTAMP_KEY, &stamp)
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist language catalog");
        }
    }
}
