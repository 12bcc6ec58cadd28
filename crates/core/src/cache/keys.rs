//! Cache key naming, `namespace.identity`.

/// Cache key for the full author collection.
pub const AUTHORS_ALL_KEY: &str = "authors.all";

/// Cache key for the full book collection.
pub const BOOKS_ALL_KEY: &str = "books.all";

/// Returns the cache key for a single author.
pub fn author_key(author_id: i64) -> String {
    format!("author.{}", author_id)
}

/// Returns the cache key for an author joined with its books.
pub fn author_books_key(author_id: i64) -> String {
    format!("author.books.{}", author_id)
}

/// Returns the cache key for a single book.
pub fn book_key(book_id: i64) -> String {
    format!("book.{}", book_id)
}
