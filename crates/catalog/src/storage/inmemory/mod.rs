//! In-memory storage backend.
//!
//! Keeps authors and books in ordered maps behind a single `RwLock`.
//! Useful for tests and for running the CLI without a database file.

mod repository;

pub use repository::InMemoryRepository;
