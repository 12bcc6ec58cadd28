//! Cache-aside access to books.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::cache::{
    book_changed_keys, book_created_keys, book_key, Cache, CacheErrorPolicy, BOOKS_ALL_KEY,
};
use catalog_core::catalog::{
    Book, BookRevision, BookUpdate, CatalogError, NewBook, Result, WriteOperation, BOOK,
};
use catalog_core::storage::BookRepository;

use super::cache_aside::{write_error, CacheAside};

/// Book operations fronted by a read cache.
///
/// Book writes also invalidate the owning author's `author.books.{id}` key,
/// and the previous owner's when a book changes hands.
pub struct BookCacheService<R: ?Sized, C: ?Sized> {
    repository: Arc<R>,
    cache: CacheAside<C>,
}

impl<R, C> BookCacheService<R, C>
where
    R: BookRepository + ?Sized,
    C: Cache + ?Sized,
{
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

    pub async fn get_all(&self) -> Result<Vec<Book>> {
        let books = self
            .cache
            .read_through(BOOKS_ALL_KEY, BOOK, None, async {
                self.repository.get_books().await.map(Some)
            })
            .await?;
        Ok(books.unwrap_or_default())
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        self.cache
            .read_through(&book_key(id), BOOK, Some(id), async {
                self.repository.get_book(id).await
            })
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Inserts a book. The referenced author must exist.
    pub async fn create(&self, book: &NewBook) -> Result<Book> {
        let created = self
            .repository
            .create_book(book)
            .await
            .map_err(|e| write_error(e, BOOK, WriteOperation::Create, None))?;

        self.cache
            .invalidate(
                &book_created_keys(created.author_id),
                BOOK,
                WriteOperation::Create,
                Some(created.id),
            )
            .await?;

        tracing::debug!(book_id = created.id, author_id = created.author_id, "Book created");
        Ok(created)
    }

    /// Applies `changes` to an existing book, possibly moving it to another author.
    ///
    /// Clears the book lists of both the owner the store replaced and the new one.
    pub async fn update(&self, id: i64, changes: &BookUpdate) -> Result<Book> {
        let BookRevision { previous, current } = self
            .repository
            .update_book(id, changes)
            .await
            .map_err(|e| write_error(e, BOOK, WriteOperation::Update, Some(id)))?;

        self.cache
            .invalidate(
                &book_changed_keys(id, previous.author_id, current.author_id),
                BOOK,
                WriteOperation::Update,
                Some(id),
            )
            .await?;

        tracing::debug!(
            book_id = id,
            author_id = current.author_id,
            previous_author_id = previous.author_id,
            "Book updated"
        );
        Ok(current)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .repository
            .delete_book(id)
            .await
            .map_err(|e| write_error(e, BOOK, WriteOperation::Delete, Some(id)))?;

        self.cache
            .invalidate(
                &book_changed_keys(id, removed.author_id, removed.author_id),
                BOOK,
                WriteOperation::Delete,
                Some(id),
            )
            .await?;

        tracing::debug!(book_id = id, author_id = removed.author_id, "Book deleted");
        Ok(())
    }
}

fn not_found(id: i64) -> CatalogError {
    tracing::debug!(book_id = id, "Book not found");
    CatalogError::NotFound {
        entity_type: BOOK,
        id,
    }
}
