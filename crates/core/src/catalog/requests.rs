//! Write payloads for authors and books.
//!
//! Input validation happens before these reach the services. Following the
//! Functional Core pattern, these are pure data types with no I/O, and the
//! `apply_to` functions are shared by every store backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Author, Book};

/// Payload for inserting a new author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub bio: String,
    pub birth_date: NaiveDate,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, bio: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            birth_date,
        }
    }

    /// Builds the stored row once the store has assigned an ID.
    pub fn into_author(self, id: i64, now: DateTime<Utc>) -> Author {
        Author {
            id,
            name: self.name,
            bio: self.bio,
            birth_date: self.birth_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial change set for an author. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl AuthorUpdate {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Applies the changes to an existing row and bumps `updated_at`.
    pub fn apply_to(&self, mut author: Author, now: DateTime<Utc>) -> Author {
        if let Some(name) = &self.name {
            author.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            author.bio = bio.clone();
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = birth_date;
        }
        author.updated_at = now;
        author
    }
}

/// Payload for inserting a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub author_id: i64,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        publish_date: NaiveDate,
        author_id: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            publish_date,
            author_id,
        }
    }

    /// Builds the stored row once the store has assigned an ID.
    pub fn into_book(self, id: i64, now: DateTime<Utc>) -> Book {
        Book {
            id,
            title: self.title,
            description: self.description,
            publish_date: self.publish_date,
            author_id: self.author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial change set for a book. Setting `author_id` moves the book to
/// another author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

impl BookUpdate {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_publish_date(mut self, publish_date: NaiveDate) -> Self {
        self.publish_date = Some(publish_date);
        self
    }

    pub fn with_author_id(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Applies the changes to an existing row and bumps `updated_at`.
    pub fn apply_to(&self, mut book: Book, now: DateTime<Utc>) -> Book {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(description) = &self.description {
            book.description = description.clone();
        }
        if let Some(publish_date) = self.publish_date {
            book.publish_date = publish_date;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        book.updated_at = now;
        book
    }
}
