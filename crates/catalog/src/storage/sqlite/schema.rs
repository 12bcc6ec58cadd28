//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// `foreign_keys` is a per-connection setting, so it is switched on here
/// alongside the table definitions.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    bio TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    publish_date TEXT NOT NULL,
    author_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id);
"#;

// Author queries
pub const INSERT_AUTHOR: &str = r#"
INSERT INTO authors (name, bio, birth_date, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_AUTHORS: &str = r#"
SELECT id, name, bio, birth_date, created_at, updated_at
FROM authors
ORDER BY id
"#;

pub const SELECT_AUTHOR_BY_ID: &str = r#"
SELECT id, name, bio, birth_date, created_at, updated_at
FROM authors
WHERE id = ?1
"#;

pub const UPDATE_AUTHOR: &str = r#"
UPDATE authors
SET name = ?2, bio = ?3, birth_date = ?4, updated_at = ?5
WHERE id = ?1
"#;

pub const DELETE_AUTHOR: &str = r#"
DELETE FROM authors WHERE id = ?1
"#;

// Book queries
pub const INSERT_BOOK: &str = r#"
INSERT INTO books (title, description, publish_date, author_id, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_BOOKS: &str = r#"
SELECT id, title, description, publish_date, author_id, created_at, updated_at
FROM books
ORDER BY id
"#;

pub const SELECT_BOOK_BY_ID: &str = r#"
SELECT id, title, description, publish_date, author_id, created_at, updated_at
FROM books
WHERE id = ?1
"#;

pub const SELECT_BOOKS_BY_AUTHOR: &str = r#"
SELECT id, title, description, publish_date, author_id, created_at, updated_at
FROM books
WHERE author_id = ?1
ORDER BY id
"#;

pub const UPDATE_BOOK: &str = r#"
UPDATE books
SET title = ?2, description = ?3, publish_date = ?4, author_id = ?5, updated_at = ?6
WHERE id = ?1
"#;

pub const DELETE_BOOK: &str = r#"
DELETE FROM books WHERE id = ?1
"#;
