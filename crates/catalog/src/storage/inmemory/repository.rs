//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use catalog_core::catalog::{
    Author, AuthorUpdate, AuthorWithBooks, Book, BookRevision, BookUpdate, NewAuthor, NewBook,
    AUTHOR, BOOK,
};
use catalog_core::storage::{AuthorRepository, BookRepository, RepositoryError, Result};

/// Both tables behind one lock so cascades and reference checks are atomic.
#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, Book>,
    last_author_id: i64,
    last_book_id: i64,
}

impl Tables {
    fn ensure_author(&self, author_id: i64) -> Result<()> {
        if self.authors.contains_key(&author_id) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidData(format!(
                "Book references unknown author {author_id}"
            )))
        }
    }

    fn books_of(&self, author_id: i64) -> Vec<Book> {
        self.books
            .values()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect()
    }
}

/// In-memory storage backend.
///
/// IDs are assigned sequentially from 1 and never reused, like SQLite's
/// `AUTOINCREMENT`. Deleting an author deletes its books.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryRepository {
    async fn get_authors(&self) -> Result<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.values().cloned().collect())
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.get(&id).cloned())
    }

    async fn get_author_with_books(&self, id: i64) -> Result<Option<AuthorWithBooks>> {
        let tables = self.tables.read().await;
        Ok(tables
            .authors
            .get(&id)
            .cloned()
            .map(|author| author.with_books(tables.books_of(id))))
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        let mut tables = self.tables.write().await;
        tables.last_author_id += 1;
        let author = author.clone().into_author(tables.last_author_id, Utc::now());
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, id: i64, changes: &AuthorUpdate) -> Result<Author> {
        let mut tables = self.tables.write().await;
        let current = tables
            .authors
            .remove(&id)
            .ok_or(RepositoryError::NotFound {
                entity_type: AUTHOR,
                id,
            })?;
        let updated = changes.apply_to(current, Utc::now());
        tables.authors.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_author(&self, id: i64) -> Result<AuthorWithBooks> {
        let mut tables = self.tables.write().await;
        let author = tables.authors.remove(&id).ok_or(RepositoryError::NotFound {
            entity_type: AUTHOR,
            id,
        })?;
        let books = tables.books_of(id);
        tables.books.retain(|_, book| book.author_id != id);
        Ok(author.with_books(books))
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn get_books(&self) -> Result<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().cloned().collect())
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.get(&id).cloned())
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let mut tables = self.tables.write().await;
        tables.ensure_author(book.author_id)?;
        tables.last_book_id += 1;
        let book = book.clone().into_book(tables.last_book_id, Utc::now());
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i64, changes: &BookUpdate) -> Result<BookRevision> {
        let mut tables = self.tables.write().await;
        let previous = tables.books.get(&id).cloned().ok_or(RepositoryError::NotFound {
            entity_type: BOOK,
            id,
        })?;
        let current = changes.apply_to(previous.clone(), Utc::now());
        tables.ensure_author(current.author_id)?;
        tables.books.insert(id, current.clone());
        Ok(BookRevision { previous, current })
    }

    async fn delete_book(&self, id: i64) -> Result<Book> {
        let mut tables = self.tables.write().await;
        tables.books.remove(&id).ok_or(RepositoryError::NotFound {
            entity_type: BOOK,
            id,
        })
    }
}
