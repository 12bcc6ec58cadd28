//! Composition root: wires the feature-selected store and cache into the services.

use std::sync::Arc;

#[cfg(any(feature = "sqlite", feature = "redis"))]
use anyhow::Context;

use crate::cache::CacheBackend;
use crate::config::Config;
use crate::services::{AuthorCacheService, BookCacheService};
use crate::storage::Store;

/// Both entity services, sharing one store and one cache.
pub struct Catalog {
    pub authors: AuthorCacheService<Store, CacheBackend>,
    pub books: BookCacheService<Store, CacheBackend>,
}

impl Catalog {
    /// Opens the configured backends and builds the services.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(open_store(config).await?);
        let cache = Arc::new(open_cache(config).await?);

        tracing::debug!(
            ttl_secs = config.cache_ttl_seconds,
            policy = ?config.cache_error_policy,
            "Catalog backends ready"
        );

        Ok(Self::from_parts(store, cache, config))
    }

    /// Builds the services over already opened backends.
    pub fn from_parts(store: Arc<Store>, cache: Arc<CacheBackend>, config: &Config) -> Self {
        let ttl = config.cache_ttl();
        let policy = config.cache_error_policy;

        Self {
            authors: AuthorCacheService::new(Arc::clone(&store), Arc::clone(&cache), ttl)
                .with_cache_error_policy(policy),
            books: BookCacheService::new(store, cache, ttl).with_cache_error_policy(policy),
        }
    }
}

#[cfg(feature = "sqlite")]
async fn open_store(config: &Config) -> anyhow::Result<Store> {
    tracing::debug!(path = %config.sqlite_path, "Opening SQLite store");
    Store::new(&config.sqlite_path)
        .await
        .with_context(|| format!("failed to open SQLite database at {}", config.sqlite_path))
}

#[cfg(feature = "inmemory")]
async fn open_store(_config: &Config) -> anyhow::Result<Store> {
    tracing::debug!("Using in-memory store");
    Ok(Store::new())
}

#[cfg(feature = "memory")]
async fn open_cache(config: &Config) -> anyhow::Result<CacheBackend> {
    tracing::debug!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Ok(CacheBackend::new(config.cache_max_entries))
}

#[cfg(feature = "redis")]
async fn open_cache(config: &Config) -> anyhow::Result<CacheBackend> {
    tracing::debug!(url = %config.redis_url, "Connecting to Redis cache");
    CacheBackend::new(&config.redis_url)
        .await
        .with_context(|| format!("failed to connect to Redis at {}", config.redis_url))
}
