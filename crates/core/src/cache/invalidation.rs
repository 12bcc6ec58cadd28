//! Invalidation fan-out: the cache keys a write makes stale.
//!
//! Every key whose value embeds the written row is listed here, including
//! keys owned by another entity family. An author's book list lives under
//! `author.books.{id}`, so book writes reach into the author namespace.

use super::keys::{author_books_key, author_key, book_key, AUTHORS_ALL_KEY, BOOKS_ALL_KEY};

/// Keys made stale by inserting an author.
pub fn author_created_keys() -> Vec<String> {
    vec![AUTHORS_ALL_KEY.to_string()]
}

/// Keys made stale by updating an author.
pub fn author_updated_keys(author_id: i64) -> Vec<String> {
    vec![
        AUTHORS_ALL_KEY.to_string(),
        author_key(author_id),
        author_books_key(author_id),
    ]
}

/// Keys made stale by deleting an author.
///
/// `cascaded_book_ids` are the books the store removed along with the author;
/// their single-book keys and the book collection go too.
pub fn author_deleted_keys(author_id: i64, cascaded_book_ids: &[i64]) -> Vec<String> {
    let mut keys = author_updated_keys(author_id);
    if !cascaded_book_ids.is_empty() {
        keys.push(BOOKS_ALL_KEY.to_string());
        keys.extend(cascaded_book_ids.iter().map(|id| book_key(*id)));
    }
    keys
}

/// Keys made stale by inserting a book owned by `author_id`.
pub fn book_created_keys(author_id: i64) -> Vec<String> {
    vec![BOOKS_ALL_KEY.to_string(), author_books_key(author_id)]
}

/// Keys made stale by updating or deleting a book.
///
/// When the write moved the book to another author, both owners' book lists
/// are invalidated.
pub fn book_changed_keys(book_id: i64, previous_author_id: i64, author_id: i64) -> Vec<String> {
    let mut keys = vec![
        BOOKS_ALL_KEY.to_string(),
        book_key(book_id),
        author_books_key(author_id),
    ];
    if previous_author_id != author_id {
        keys.push(author_books_key(previous_author_id));
    }
    keys
}
