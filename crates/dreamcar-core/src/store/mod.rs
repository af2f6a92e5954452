//! Key-value storage abstraction for locally persisted state.
//!
//! The [`KvStore`] trait mirrors a browser's `localStorage`: string keys
//! mapping to string values, read and written synchronously. The only
//! state kept this way is the affiliate performance tally
//! (see [`counters`](crate::counters)).
//!
//! Implementations:
//!
//! | Type | Backing |
//! |------|---------|
//! | [`memory::InMemoryKvStore`] | `HashMap` behind a `RwLock` (tests, ephemeral sessions) |
//! | `JsonFileKvStore` (application crate) | One JSON object on disk |

pub mod memory;

use anyhow::Result;

/// Synchronous string key-value store.
pub trait KvStore {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
