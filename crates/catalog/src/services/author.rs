//! Cache-aside access to authors.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::cache::{
    author_books_key, author_created_keys, author_deleted_keys, author_key, author_updated_keys,
    Cache, CacheErrorPolicy, AUTHORS_ALL_KEY,
};
use catalog_core::catalog::{
    Author, AuthorUpdate, AuthorWithBooks, CatalogError, NewAuthor, Result, WriteOperation, AUTHOR,
};
use catalog_core::storage::AuthorRepository;

use super::cache_aside::{write_error, CacheAside};

/// Author operations fronted by a read cache.
///
/// Reads are served from the cache when possible. Writes go to the store
/// first, then delete every key the write made stale, including the
/// author's joined book list.
pub struct AuthorCacheService<R: ?Sized, C: ?Sized> {
    repository: Arc<R>,
    cache: CacheAside<C>,
}

impl<R, C> AuthorCacheService<R, C>
where
    R: AuthorRepository + ?Sized,
    C: Cache + ?Sized,
{
    /// Creates a new author service.
    ///
    /// # Arguments
    ///
    /// * `repository` - The store gateway holding author rows
    /// * `cache` - The cache gateway
    /// * `ttl` - Time-to-live for populated keys
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: CacheAside::new(cache, ttl),
        }
    }

    pub fn with_cache_error_policy(mut self, policy: CacheErrorPolicy) -> Self {
        self.cache = self.cache.with_policy(policy);
        self
    }

    pub fn cache_error_policy(&self) -> CacheErrorPolicy {
        self.cache.policy()
    }

    /// Time-to-live given to keys populated on a miss.
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Returns every author.
    pub async fn get_all(&self) -> Result<Vec<Author>> {
        let authors = self
            .cache
            .read_through(AUTHORS_ALL_KEY, AUTHOR, None, async {
                self.repository.get_authors().await.map(Some)
            })
            .await?;
        Ok(authors.unwrap_or_default())
    }

    /// Returns one author.
    pub async fn get(&self, id: i64) -> Result<Author> {
        self.cache
            .read_through(&author_key(id), AUTHOR, Some(id), async {
                self.repository.get_author(id).await
            })
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Returns one author together with all of its books.
    pub async fn get_with_books(&self, id: i64) -> Result<AuthorWithBooks> {
        self.cache
            .read_through(&author_books_key(id), AUTHOR, Some(id), async {
                self.repository.get_author_with_books(id).await
            })
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Inserts an author.
    pub async fn create(&self, author: &NewAuthor) -> Result<Author> {
        let created = self
            .repository
            .create_author(author)
            .await
            .map_err(|e| write_error(e, AUTHOR, WriteOperation::Create, None))?;

        self.cache
            .invalidate(
                &author_created_keys(),
                AUTHOR,
                WriteOperation::Create,
                Some(created.id),
            )
            .await?;

        tracing::debug!(author_id = created.id, "Author created");
        Ok(created)
    }

    /// Applies `changes` to an existing author.
    pub async fn update(&self, id: i64, changes: &AuthorUpdate) -> Result<Author> {
        let updated = self
            .repository
            .update_author(id, changes)
            .await
            .map_err(|e| write_error(e, AUTHOR, WriteOperation::Update, Some(id)))?;

        self.cache
            .invalidate(
                &author_updated_keys(id),
                AUTHOR,
                WriteOperation::Update,
                Some(id),
            )
            .await?;

        tracing::debug!(author_id = id, "Author updated");
        Ok(updated)
    }

    /// Deletes an author and, through the store's cascade, its books.
    ///
    /// Clears the keys of exactly the books the store reports it removed.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .repository
            .delete_author(id)
            .await
            .map_err(|e| write_error(e, AUTHOR, WriteOperation::Delete, Some(id)))?;

        self.cache
            .invalidate(
                &author_deleted_keys(id, &removed.book_ids()),
                AUTHOR,
                WriteOperation::Delete,
                Some(id),
            )
            .await?;

        tracing::debug!(
            author_id = id,
            cascaded_books = removed.books.len(),
            "Author deleted"
        );
        Ok(())
    }
}

fn not_found(id: i64) -> CatalogError {
    tracing::debug!(author_id = id, "Author not found");
    CatalogError::NotFound {
        entity_type: AUTHOR,
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{date, MockCache, MockStore};
    use catalog_core::cache::{encode_payload, DEFAULT_CACHE_TTL};
    use catalog_core::storage::BookRepository;

    fn service(
        store: &Arc<MockStore>,
        cache: &Arc<MockCache>,
    ) -> AuthorCacheService<MockStore, MockCache> {
        AuthorCacheService::new(Arc::clone(store), Arc::clone(cache), DEFAULT_CACHE_TTL)
    }

    fn setup() -> (Arc<MockStore>, Arc<MockCache>) {
        (Arc::new(MockStore::new()), Arc::new(MockCache::new()))
    }

    #[tokio::test]
    async fn test_get_populates_cache_with_ttl() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        let service = service(&store, &cache);

        let author = service.get(jane.id).await.unwrap();

        assert_eq!(author, jane);
        assert_eq!(cache.recorded_ttl("author.1"), Some(DEFAULT_CACHE_TTL));
    }

    #[tokio::test]
    async fn test_get_hit_skips_store() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        let service = service(&store, &cache);

        let first = service.get(1).await.unwrap();
        let second = service.get(1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found_and_not_cached() {
        let (store, cache) = setup();
        let service = service(&store, &cache);

        let result = service.get(7).await;

        assert_eq!(
            result,
            Err(CatalogError::NotFound {
                entity_type: "Author",
                id: 7,
            })
        );
        assert!(!cache.contains("author.7"));
    }

    #[tokio::test]
    async fn test_store_failure_is_retrieval_failure() {
        let (store, cache) = setup();
        store.fail_reads(true);
        let service = service(&store, &cache);

        let result = service.get_all().await;

        assert!(matches!(
            result,
            Err(CatalogError::RetrievalFailure {
                entity_type: "Author",
                id: None,
                ..
            })
        ));
        assert!(!cache.contains("authors.all"));
    }

    #[tokio::test]
    async fn test_cache_failure_propagates_by_default() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        cache.set_offline(true);
        let service = service(&store, &cache);

        let result = service.get(1).await;

        assert!(matches!(
            result,
            Err(CatalogError::RetrievalFailure { id: Some(1), .. })
        ));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn test_cache_failure_bypassed_when_configured() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        cache.set_offline(true);
        let service = service(&store, &cache).with_cache_error_policy(CacheErrorPolicy::Bypass);

        let author = service.get(jane.id).await.unwrap();

        assert_eq!(author, jane);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_replaced() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        cache.insert_raw("author.1", b"{\"name\":\"stale layout\"}");
        let service = service(&store, &cache);

        let author = service.get(jane.id).await.unwrap();

        assert_eq!(author, jane);
        assert_eq!(cache.recorded_ttl("author.1"), Some(DEFAULT_CACHE_TTL));
    }

    #[tokio::test]
    async fn test_wrong_shape_under_key_is_a_miss() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        cache.insert_raw("author.books.1", &encode_payload(&jane).unwrap());
        let service = service(&store, &cache);

        let joined = service.get_with_books(jane.id).await.unwrap();

        assert_eq!(joined.author, jane);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_get_with_books_cached_after_first_call() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        store.seed_book("X", jane.id);
        let service = service(&store, &cache);

        let first = service.get_with_books(jane.id).await.unwrap();
        let second = service.get_with_books(jane.id).await.unwrap();

        assert_eq!(first.book_ids(), vec![1]);
        assert_eq!(first, second);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_get_with_books_missing_author() {
        let (store, cache) = setup();
        let service = service(&store, &cache);

        let result = service.get_with_books(3).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_invalidates_only_collection() {
        let (store, cache) = setup();
        let service = service(&store, &cache);

        let created = service
            .create(&NewAuthor::new("Jane", "Novelist", date(1990, 1, 1)))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(cache.deleted_keys(), vec!["authors.all"]);
    }

    #[tokio::test]
    async fn test_create_after_get_all_is_visible() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        let service = service(&store, &cache);
        assert_eq!(service.get_all().await.unwrap().len(), 1);

        service
            .create(&NewAuthor::new("Ann", "Poet", date(1980, 5, 5)))
            .await
            .unwrap();

        assert_eq!(service.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_failure_is_write_failure() {
        let (store, cache) = setup();
        store.fail_writes(true);
        let service = service(&store, &cache);

        let result = service
            .create(&NewAuthor::new("Jane", "Novelist", date(1990, 1, 1)))
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::WriteFailure {
                operation: WriteOperation::Create,
                ..
            })
        ));
        assert!(cache.deleted_keys().is_empty());
    }

    #[tokio::test]
    async fn test_update_invalidates_and_refreshes() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        let service = service(&store, &cache);
        service.get(1).await.unwrap();
        service.get_with_books(1).await.unwrap();
        service.get_all().await.unwrap();

        service
            .update(1, &AuthorUpdate::default().with_name("Jane Doe"))
            .await
            .unwrap();

        assert!(!cache.contains("author.1"));
        assert!(!cache.contains("authors.all"));
        assert!(!cache.contains("author.books.1"));
        assert_eq!(service.get(1).await.unwrap().name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (store, cache) = setup();
        let service = service(&store, &cache);

        let result = service
            .update(9, &AuthorUpdate::default().with_bio("Ghost"))
            .await;

        assert_eq!(
            result,
            Err(CatalogError::NotFound {
                entity_type: "Author",
                id: 9,
            })
        );
        assert!(cache.deleted_keys().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_failed_invalidation_is_write_failure() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        cache.fail_deletes_of("author.1");
        let service = service(&store, &cache);

        let result = service
            .update(1, &AuthorUpdate::default().with_name("Jane Doe"))
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::WriteFailure {
                operation: WriteOperation::Update,
                id: Some(1),
                ..
            })
        ));
        assert_eq!(cache.deleted_keys().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (store, cache) = setup();
        store.seed_author("Jane");
        let service = service(&store, &cache);
        service.get(1).await.unwrap();

        service.delete(1).await.unwrap();

        assert!(!cache.contains("author.1"));
        assert!(service.get(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_invalidates_cascaded_books() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        store.seed_book("X", jane.id);
        store.seed_book("Y", jane.id);
        let service = service(&store, &cache);

        service.delete(jane.id).await.unwrap();

        assert_eq!(
            cache.deleted_keys(),
            vec![
                "authors.all",
                "author.1",
                "author.books.1",
                "books.all",
                "book.1",
                "book.2",
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (store, cache) = setup();
        let service = service(&store, &cache);

        let result = service.delete(4).await;

        assert!(result.unwrap_err().is_not_found());
        assert!(cache.deleted_keys().is_empty());
    }

    #[tokio::test]
    async fn test_delete_invalidates_book_added_right_before_it() {
        let (store, cache) = setup();
        let jane = store.seed_author("Jane");
        let service = service(&store, &cache);
        service.get_with_books(jane.id).await.unwrap();

        // Another writer adds a book for Jane and a reader caches the new
        // listing just before the delete runs.
        let (late_store, late_cache) = (Arc::clone(&store), Arc::clone(&cache));
        store.before_next_write(move || {
            let late = late_store.seed_book("Late", jane.id);
            late_cache.insert_raw("books.all", &encode_payload(&vec![late]).unwrap());
        });

        service.delete(jane.id).await.unwrap();

        assert!(!cache.contains("books.all"));
        assert!(cache.deleted_keys().contains(&"book.1".to_string()));
        assert!(store.get_books().await.unwrap().is_empty());
    }
}
