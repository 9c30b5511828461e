//! Persistence backends for bplog.
//!
//! The reading store only needs a key-value contract: read a text blob by key
//! and overwrite it. [`SqliteBackend`] keeps it on disk, [`MemoryBackend`]
//! keeps it in process.

pub mod migrations;
pub mod schema;

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::error::Result;

/// Key-value persistence used by the reading store.
pub trait Backend {
    /// Read the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
