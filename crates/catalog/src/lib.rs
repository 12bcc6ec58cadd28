//! catalog - authors and books behind a cache-aside access layer.
//!
//! Store and cache backends are chosen with cargo features; see
//! [`storage`] and [`cache`].

pub mod cache;
pub mod cli;
pub mod config;
pub mod output;
pub mod services;
pub mod state;
pub mod storage;

pub use config::Config;
pub use services::{AuthorCacheService, BookCacheService};
pub use state::Catalog;
