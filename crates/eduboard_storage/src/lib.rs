//! # Eduboard Storage
//!
//! Keyed storage backends for the Eduboard data store.
//!
//! This crate provides the lowest-level persistence abstraction: a backend
//! is an **opaque keyed byte store**. It maps collection keys to whole
//! serialized documents and never interprets their contents — document
//! format, seeding, and validation all live in `eduboard_core`.
//!
//! ## Design Principles
//!
//! - One durable key per entity collection, holding the full document
//! - Absence of a key is a valid state (`Ok(None)`), never an error
//! - Writes are whole-document overwrites, no incremental updates
//! - Backends must be `Send + Sync` so a store handle can be shared
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`DirBackend`] - One file per key inside a locked store directory
//!
//! ## Example
//!
//! ```rust
//! use eduboard_storage::{StorageBackend, MemoryBackend};
//!
//! let mut backend = MemoryBackend::new();
//! backend.save("categories", b"[]").unwrap();
//! assert_eq!(backend.load("categories").unwrap(), Some(b"[]".to_vec()));
//! assert_eq!(backend.load("courses").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod dir;
mod error;
mod memory;

pub use backend::StorageBackend;
pub use dir::DirBackend;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
