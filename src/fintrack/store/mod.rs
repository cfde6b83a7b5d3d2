//! # Storage Layer
//!
//! Durable state lives in a string-keyed key-value store behind the
//! [`StorageBackend`] trait. [`Storage`] sits on top of a backend and knows
//! which documents live under which keys.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production file-based storage, one JSON file
//!   per key, written atomically.
//! - [`mem_backend::MemBackend`]: In-memory storage for testing, with write
//!   error simulation.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── finance-records.json    # JSON array of records
//! ├── finance-settings.json   # Settings object
//! └── finance-firstLoad.json  # "true" once the seed has been loaded
//! ```
//!
//! ## Failure Policy
//!
//! Reads and writes of records and settings never fail the caller. A
//! malformed document reads as "nothing stored" and a failed write is
//! logged and dropped. The `try_*` variants expose the underlying `Result`
//! for callers that want to react to it.

pub mod backend;
pub mod fs_backend;
pub mod gateway;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use gateway::{ImportCheck, Storage};

/// Key holding the record collection.
pub const RECORDS_KEY: &str = "finance:records";
/// Key holding the settings object.
pub const SETTINGS_KEY: &str = "finance:settings";
/// Key marking that the seed document has been loaded once.
pub const FIRST_LOAD_KEY: &str = "finance:firstLoad";
