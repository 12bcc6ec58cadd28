//! catalog_core - pure types and contracts for the catalog service.
//!
//! Nothing in this crate performs I/O. Store and cache backends live in the
//! `catalog` crate and plug in through the traits defined here.

pub mod cache;
pub mod catalog;
pub mod storage;
