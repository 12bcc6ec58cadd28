//! Pure functions for encoding/decoding cached values.
//!
//! Every payload is a JSON envelope that names its own shape and format
//! version:
//!
//! ```json
//! {"version":1,"shape":"author_with_books","data":{"id":1,"books":[]}}
//! ```
//!
//! A payload written by an incompatible version, or read back as the wrong
//! shape, fails to decode instead of producing a half-filled value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Author, AuthorWithBooks, Book};

/// Current envelope format version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
    /// The payload was written with a different envelope version.
    #[error("Unsupported payload version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    /// The payload holds a different shape than requested.
    #[error("Payload shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: PayloadShape,
        found: PayloadShape,
    },
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// The shape of value held by a cache payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    Author,
    AuthorList,
    AuthorWithBooks,
    Book,
    BookList,
}

/// A value that can be stored in the cache.
pub trait CachePayload: Serialize + DeserializeOwned {
    const SHAPE: PayloadShape;
}

impl CachePayload for Author {
    const SHAPE: PayloadShape = PayloadShape::Author;
}

impl CachePayload for Vec<Author> {
    const SHAPE: PayloadShape = PayloadShape::AuthorList;
}

impl CachePayload for AuthorWithBooks {
    const SHAPE: PayloadShape = PayloadShape::AuthorWithBooks;
}

impl CachePayload for Book {
    const SHAPE: PayloadShape = PayloadShape::Book;
}

impl CachePayload for Vec<Book> {
    const SHAPE: PayloadShape = PayloadShape::BookList;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    shape: PayloadShape,
    data: &'a T,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
    shape: PayloadShape,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Encodes a value into envelope bytes.
pub fn encode_payload<T: CachePayload>(value: &T) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        version: PAYLOAD_VERSION,
        shape: T::SHAPE,
        data: value,
    };
    serde_json::to_vec(&envelope).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Decodes envelope bytes, checking version and shape before the data.
pub fn decode_payload<T: CachePayload>(bytes: &[u8]) -> Result<T> {
    let header: Header = serde_json::from_slice(bytes)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;

    if header.version != PAYLOAD_VERSION {
        return Err(SerializationError::UnsupportedVersion {
            found: header.version,
            expected: PAYLOAD_VERSION,
        });
    }
    if header.shape != T::SHAPE {
        return Err(SerializationError::ShapeMismatch {
            expected: T::SHAPE,
            found: header.shape,
        });
    }

    let envelope: Envelope<T> = serde_json::from_slice(bytes)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;
    Ok(envelope.data)
}
