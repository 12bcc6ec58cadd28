use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Entity name used in errors and logs for authors.
pub const AUTHOR: &str = "Author";

/// Entity name used in errors and logs for books.
pub const BOOK: &str = "Book";

/// A book author.
///
/// The `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Attaches the author's books, producing the joined view.
    pub fn with_books(self, books: Vec<Book>) -> AuthorWithBooks {
        AuthorWithBooks { author: self, books }
    }
}

/// A book. `author_id` references an existing [`Author`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An author together with every book referencing it.
///
/// Serializes as the author's fields plus a `books` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

impl AuthorWithBooks {
    /// Returns the IDs of the embedded books.
    pub fn book_ids(&self) -> Vec<i64> {
        self.books.iter().map(|b| b.id).collect()
    }
}

/// A book row as it was read and as it was written by one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRevision {
    pub previous: Book,
    pub current: Book,
}

impl BookRevision {
    /// Whether the update moved the book to another author.
    pub fn changed_owner(&self) -> bool {
        self.previous.author_id != self.current.author_id
    }
}
