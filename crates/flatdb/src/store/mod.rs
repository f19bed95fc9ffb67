//! # Storage Layer
//!
//! This module holds the document [`Store`] and the raw I/O backends it sits on.
//!
//! ## Files are the Database
//!
//! There is no index, manifest or cache. A collection is a directory, a record
//! is one file in it, and the directory listing *is* the index:
//!
//! ```text
//! <root>/
//! ├── bands/
//! │   ├── pink_floyd.json
//! │   └── yes.json
//! └── albums/
//!     └── close_to_the_edge.json
//! ```
//!
//! Each file holds a single JSON document, tab-indented and newline-terminated.
//!
//! ## Write Protocol
//!
//! Every write goes to `<resource>.json.tmp` next to the final file and is then
//! renamed over it. Rename replaces the old content in one filesystem step, so a
//! reader sees the previous complete document or the new complete document and
//! nothing in between. If the rename itself fails the `.tmp` file stays on disk;
//! it is not a record (listings only pick up `*.json`) and the next write of the
//! same resource overwrites it.
//!
//! ## Locking
//!
//! - Write, Update and Delete hold the collection's lock end-to-end.
//! - Read, ReadAll and Query take no lock at all.
//! - Different collections never block each other.
//!
//! Callers must not modify files under the root while a store is using it.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production filesystem layout.
//! - [`mem_backend::MemBackend`]: For testing store logic without filesystem I/O.

pub mod backend;
pub mod doc_store;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use doc_store::{Store, StoreOptions};
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
