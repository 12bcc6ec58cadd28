//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `catalog_core::storage`, selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: process-local maps, nothing persisted
//!
//! These features are mutually exclusive.
//!
//! ```bash
//! cargo build -p catalog --no-default-features --features inmemory,memory
//! ```

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p catalog --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

/// The storage backend selected by feature flags.
#[cfg(feature = "sqlite")]
pub type Store = SqliteRepository;

/// The storage backend selected by feature flags.
#[cfg(feature = "inmemory")]
pub type Store = InMemoryRepository;
