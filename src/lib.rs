//! Single-user personal library catalog persisted to a flat JSON file.
//!
//! This crate provides a record store for book entries. Every operation is
//! a self-contained load, compute, save cycle against the storage file;
//! no state is cached between calls.

pub mod book;
pub mod store;

pub use book::{Book, BookStatus};
pub use store::{LibraryError, LibraryStore, SearchQuery};
