//! # flatdb Architecture
//!
//! flatdb is an **embedded document store** that uses the filesystem as its only
//! storage medium: one directory per collection, one JSON file per record. It is
//! a library first; the `flatdb` command-line client is a thin consumer of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/doc_store.rs)                                 │
//! │  - write / read / update / delete / batch_write             │
//! │  - query / read_all / get_stats / add_validator             │
//! │  - Identifier checks, validation, stats bookkeeping         │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                    │
//!          ▼                  ▼                    ▼
//! ┌────────────────┐ ┌─────────────────┐ ┌────────────────────┐
//! │ lock.rs        │ │ validate.rs     │ │ stats.rs           │
//! │ one mutex per  │ │ per-collection  │ │ counters + record  │
//! │ collection     │ │ Validator trait │ │ count per coll.    │
//! └────────────────┘ └─────────────────┘ └────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Backend (store/backend.rs)                         │
//! │  - FsBackend (production), MemBackend (testing)             │
//! │  - Atomic write: tmp file + rename                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `record.rs` is the codec (tab-indented JSON, newline-terminated) and the
//! untyped [`Record`] mapping used by Update and Query; `query.rs` holds the
//! single-field filter and the structural comparison it relies on.
//!
//! ## Concurrency
//!
//! [`Store`] is `Send + Sync`; share it with `Arc`. Mutations on one collection
//! are serialized, mutations on different collections run in parallel, and
//! reads never block. See [`store`] for the exact guarantees.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//!
//! ## Example
//!
//! ```
//! use flatdb::{Query, Store, StoreOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = Store::open(dir.path(), StoreOptions::default()).unwrap();
//!
//! store.write("bands", "yes", &json!({"name": "Yes", "genre": "Rock"})).unwrap();
//! store.write("bands", "weather_report", &json!({"name": "Weather Report", "genre": "Jazz"})).unwrap();
//!
//! let rock = store.query("bands", &Query::eq("genre", "Rock")).unwrap();
//! assert_eq!(rock.len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod lock;
pub mod query;
pub mod record;
pub mod stats;
pub mod store;
pub mod validate;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use error::{ErrorKind, Result, StoreError};
pub use query::{Operator, Query};
pub use record::Record;
pub use stats::CollectionStats;
pub use store::{FsBackend, MemBackend, StorageBackend, Store, StoreOptions};
pub use validate::{RequiredFields, ValidationError, Validator};
