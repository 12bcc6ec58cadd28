//! SQLite repository implementation.
//!
//! Implements the repository traits from `catalog_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior};
use tokio_rusqlite::Connection;

use catalog_core::catalog::{
    Author, AuthorUpdate, AuthorWithBooks, Book, BookRevision, BookUpdate, NewAuthor, NewBook,
    AUTHOR, BOOK,
};
use catalog_core::storage::{AuthorRepository, BookRepository, RepositoryError, Result};

use super::conversions::{format_date, format_datetime, row_to_author, row_to_book};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Opens a transaction that holds the write lock from its first read.
fn write_tx(conn: &mut rusqlite::Connection) -> rusqlite::Result<rusqlite::Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

/// Runs a prepared statement and collects every mapped row.
fn query_all<T, P>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    rows.collect()
}

/// SQLite-based repository implementation.
///
/// A single connection serves both authors and books; `tokio_rusqlite`
/// runs every call on its own background thread.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// AuthorRepository implementation
// ============================================================================

#[async_trait]
impl AuthorRepository for SqliteRepository {
    async fn get_authors(&self) -> Result<Vec<Author>> {
        self.conn
            .call(|conn| {
                query_all(conn, schema::SELECT_AUTHORS, [], row_to_author).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, AUTHOR))
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_AUTHOR_BY_ID, [id], row_to_author)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, AUTHOR))
    }

    async fn get_author_with_books(&self, id: i64) -> Result<Option<AuthorWithBooks>> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let author = tx
                    .query_row(schema::SELECT_AUTHOR_BY_ID, [id], row_to_author)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(author) = author else {
                    return Ok(None);
                };
                let books = query_all(&tx, schema::SELECT_BOOKS_BY_AUTHOR, [id], row_to_book)
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Some(author.with_books(books)))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, AUTHOR))
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        let author = author.clone();
        let now = Utc::now();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_AUTHOR,
                    rusqlite::params![
                        author.name,
                        author.bio,
                        format_date(&author.birth_date),
                        format_datetime(&now),
                        format_datetime(&now)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(author.into_author(conn.last_insert_rowid(), now))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, AUTHOR))
    }

    async fn update_author(&self, id: i64, changes: &AuthorUpdate) -> Result<Author> {
        let changes = changes.clone();
        let now = Utc::now();

        self.conn
            .call(move |conn| {
                let tx = write_tx(conn).map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_AUTHOR_BY_ID, [id], row_to_author)
                    .map_err(wrap_err)?;
                let updated = changes.apply_to(current, now);
                tx.execute(
                    schema::UPDATE_AUTHOR,
                    rusqlite::params![
                        id,
                        updated.name,
                        updated.bio,
                        format_date(&updated.birth_date),
                        format_datetime(&updated.updated_at)
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(updated)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, AUTHOR, id))
    }

    async fn delete_author(&self, id: i64) -> Result<AuthorWithBooks> {
        self.conn
            .call(move |conn| {
                // The cascade removes exactly the books read here
                let tx = write_tx(conn).map_err(wrap_err)?;
                let author = tx
                    .query_row(schema::SELECT_AUTHOR_BY_ID, [id], row_to_author)
                    .map_err(wrap_err)?;
                let books = query_all(&tx, schema::SELECT_BOOKS_BY_AUTHOR, [id], row_to_book)
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_AUTHOR, [id]).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(author.with_books(books))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, AUTHOR, id))
    }
}

// ============================================================================
// BookRepository implementation
// ============================================================================

#[async_trait]
impl BookRepository for SqliteRepository {
    async fn get_books(&self) -> Result<Vec<Book>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_BOOKS, [], row_to_book).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, BOOK))
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_BOOK_BY_ID, [id], row_to_book)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, BOOK))
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let book = book.clone();
        let now = Utc::now();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_BOOK,
                    rusqlite::params![
                        book.title,
                        book.description,
                        format_date(&book.publish_date),
                        book.author_id,
                        format_datetime(&now),
                        format_datetime(&now)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(book.into_book(conn.last_insert_rowid(), now))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, BOOK))
    }

    async fn update_book(&self, id: i64, changes: &BookUpdate) -> Result<BookRevision> {
        let changes = changes.clone();
        let now = Utc::now();

        self.conn
            .call(move |conn| {
                let tx = write_tx(conn).map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_BOOK_BY_ID, [id], row_to_book)
                    .map_err(wrap_err)?;
                let updated = changes.apply_to(current.clone(), now);
                tx.execute(
                    schema::UPDATE_BOOK,
                    rusqlite::params![
                        id,
                        updated.title,
                        updated.description,
                        format_date(&updated.publish_date),
                        updated.author_id,
                        format_datetime(&updated.updated_at)
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(BookRevision {
                    previous: current,
                    current: updated,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, BOOK, id))
    }

    async fn delete_book(&self, id: i64) -> Result<Book> {
        self.conn
            .call(move |conn| {
                let tx = write_tx(conn).map_err(wrap_err)?;
                let book = tx
                    .query_row(schema::SELECT_BOOK_BY_ID, [id], row_to_book)
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_BOOK, [id]).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(book)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, BOOK, id))
    }
}
