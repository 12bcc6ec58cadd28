mod error;
mod invalidation;
mod keys;
mod policy;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use invalidation::{
    author_created_keys, author_deleted_keys, author_updated_keys, book_changed_keys,
    book_created_keys,
};
pub use keys::{author_books_key, author_key, book_key, AUTHORS_ALL_KEY, BOOKS_ALL_KEY};
pub use policy::{CacheErrorPolicy, DEFAULT_CACHE_TTL};
pub use serialization::{
    decode_payload, encode_payload, CachePayload, PayloadShape, SerializationError,
    PAYLOAD_VERSION,
};
pub use traits::Cache;
