//! Entity cache services.
//!
//! Each service owns one entity family and talks to the store and cache
//! only through the `catalog_core` traits.

mod author;
mod book;
mod cache_aside;

#[cfg(test)]
pub(crate) mod test_support;

pub use author::AuthorCacheService;
pub use book::BookCacheService;
pub use cache_aside::CacheAside;
