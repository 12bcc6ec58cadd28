use async_trait::async_trait;

use crate::catalog::{
    Author, AuthorUpdate, AuthorWithBooks, Book, BookRevision, BookUpdate, NewAuthor, NewBook,
};

use super::Result;

/// Repository for author rows.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Gets every author, ordered by ID.
    async fn get_authors(&self) -> Result<Vec<Author>>;

    /// Gets an author by its ID.
    async fn get_author(&self, id: i64) -> Result<Option<Author>>;

    /// Gets an author together with all of its books.
    async fn get_author_with_books(&self, id: i64) -> Result<Option<AuthorWithBooks>>;

    /// Inserts a new author and returns the stored row.
    async fn create_author(&self, author: &NewAuthor) -> Result<Author>;

    /// Applies `changes` to an existing author.
    ///
    /// Returns `RepositoryError::NotFound` if the author does not exist.
    async fn update_author(&self, id: i64, changes: &AuthorUpdate) -> Result<Author>;

    /// Deletes an author. Its books are deleted with it.
    ///
    /// Returns the removed author together with every book the cascade
    /// removed, read within the same write.
    /// Returns `RepositoryError::NotFound` if the author does not exist.
    async fn delete_author(&self, id: i64) -> Result<AuthorWithBooks>;
}

/// Repository for book rows.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Gets every book, ordered by ID.
    async fn get_books(&self) -> Result<Vec<Book>>;

    /// Gets a book by its ID.
    async fn get_book(&self, id: i64) -> Result<Option<Book>>;

    /// Inserts a new book and returns the stored row.
    ///
    /// Returns `RepositoryError::InvalidData` if `author_id` references no author.
    async fn create_book(&self, book: &NewBook) -> Result<Book>;

    /// Applies `changes` to an existing book.
    ///
    /// Returns the row before and after the change, both taken within the
    /// same write.
    async fn update_book(&self, id: i64, changes: &BookUpdate) -> Result<BookRevision>;

    /// Deletes a book by its ID and returns the removed row.
    async fn delete_book(&self, id: i64) -> Result<Book>;
}
