//! Read-through, populate and invalidation shared by the entity services.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use catalog_core::cache::{decode_payload, encode_payload, Cache, CacheErrorPolicy, CachePayload};
use catalog_core::catalog::{CatalogError, Result, WriteOperation};
use catalog_core::storage::{self, RepositoryError};

/// Cache-aside access to one cache gateway.
///
/// No locking spans a lookup and the populate that follows it, nor a store
/// write and its invalidation. A read that misses just before a write and
/// populates just after it leaves a pre-write value cached until the TTL
/// expires or the next write to the same row.
pub struct CacheAside<C: ?Sized> {
    cache: Arc<C>,
    ttl: Duration,
    policy: CacheErrorPolicy,
}

impl<C> CacheAside<C>
where
    C: Cache + ?Sized,
{
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            policy: CacheErrorPolicy::default(),
        }
    }

    /// Sets how cache failures on the read path are handled.
    pub fn with_policy(mut self, policy: CacheErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn policy(&self) -> CacheErrorPolicy {
        self.policy
    }

    /// Serves `key` from the cache, or awaits `fetch` and caches what it returns.
    ///
    /// `Ok(None)` means the store has no such row; nothing is cached for it.
    /// `fetch` is only polled on a miss.
    pub async fn read_through<T, F>(
        &self,
        key: &str,
        entity_type: &'static str,
        id: Option<i64>,
        fetch: F,
    ) -> Result<Option<T>>
    where
        T: CachePayload,
        F: Future<Output = storage::Result<Option<T>>>,
    {
        if let Some(value) = self.lookup::<T>(key, entity_type, id).await? {
            return Ok(Some(value));
        }

        let fetched = fetch.await.map_err(|err| {
            tracing::error!(entity = entity_type, id, error = %err, "Store read failed");
            CatalogError::RetrievalFailure {
                entity_type,
                id,
                cause: err.to_string(),
            }
        })?;

        if let Some(value) = &fetched {
            self.populate(key, value, entity_type, id).await?;
        }

        Ok(fetched)
    }

    async fn lookup<T: CachePayload>(
        &self,
        key: &str,
        entity_type: &'static str,
        id: Option<i64>,
    ) -> Result<Option<T>> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::trace!(%key, "Cache miss");
                return Ok(None);
            }
            Err(err) => {
                self.cache_fault(key, entity_type, id, err)?;
                return Ok(None);
            }
        };

        match decode_payload::<T>(&bytes) {
            Ok(value) => {
                tracing::trace!(%key, "Cache hit");
                Ok(Some(value))
            }
            Err(err) => {
                // Overwritten by the populate that follows the miss
                tracing::warn!(%key, error = %err, "Discarding undecodable cache payload");
                Ok(None)
            }
        }
    }

    async fn populate<T: CachePayload>(
        &self,
        key: &str,
        value: &T,
        entity_type: &'static str,
        id: Option<i64>,
    ) -> Result<()> {
        let result = match encode_payload(value) {
            Ok(bytes) => self
                .cache
                .set(key, &bytes, self.ttl)
                .await
                .map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match result {
            Ok(()) => {
                tracing::trace!(%key, ttl_secs = self.ttl.as_secs(), "Cache populated");
                Ok(())
            }
            Err(cause) => self.cache_fault(key, entity_type, id, cause),
        }
    }

    /// Applies the error policy to a failed cache read or populate.
    fn cache_fault(
        &self,
        key: &str,
        entity_type: &'static str,
        id: Option<i64>,
        err: impl Display,
    ) -> Result<()> {
        match self.policy {
            CacheErrorPolicy::Bypass => {
                tracing::warn!(%key, error = %err, "Cache unavailable, using store");
                Ok(())
            }
            CacheErrorPolicy::Propagate => {
                tracing::error!(%key, error = %err, "Cache read failed");
                Err(CatalogError::RetrievalFailure {
                    entity_type,
                    id,
                    cause: format!("cache error on {key}: {err}"),
                })
            }
        }
    }

    /// Deletes every key in `keys`.
    ///
    /// All keys are attempted even after a failure; the first failure is
    /// returned as a `WriteFailure` since the write cannot be considered
    /// complete while a stale key may remain.
    pub async fn invalidate(
        &self,
        keys: &[String],
        entity_type: &'static str,
        operation: WriteOperation,
        id: Option<i64>,
    ) -> Result<()> {
        let mut first_failure = None;

        for key in keys {
            match self.cache.delete(key).await {
                Ok(()) => tracing::trace!(%key, "Cache key invalidated"),
                Err(err) => {
                    tracing::error!(%key, error = %err, "Cache invalidation failed");
                    first_failure
                        .get_or_insert_with(|| format!("cache invalidation of {key}: {err}"));
                }
            }
        }

        match first_failure {
            None => Ok(()),
            Some(cause) => Err(CatalogError::WriteFailure {
                entity_type,
                operation,
                id,
                cause,
            }),
        }
    }
}

/// Maps a failed store mutation to the service taxonomy.
///
/// A missing row stays `NotFound`; everything else is a `WriteFailure`.
pub(crate) fn write_error(
    err: RepositoryError,
    entity_type: &'static str,
    operation: WriteOperation,
    id: Option<i64>,
) -> CatalogError {
    match err {
        RepositoryError::NotFound { entity_type, id } => {
            tracing::debug!(entity = entity_type, id, %operation, "Write target not found");
            CatalogError::NotFound { entity_type, id }
        }
        err => {
            tracing::error!(
                entity = entity_type,
                id,
                %operation,
                error = %err,
                "Store write failed"
            );
            CatalogError::WriteFailure {
                entity_type,
                operation,
                id,
                cause: err.to_string(),
            }
        }
    }
}
