//! # Storage Layer
//!
//! Memo keeps all of its state in a plain key → JSON value store split into two
//! scopes, mirroring what a browser extension gets from its storage API:
//!
//! - [`Scope::Sync`]: settings that follow the user across devices
//!   (credentials, target repository, manifest path)
//! - [`Scope::Local`]: device-local working state (`working-area`,
//!   `new-tagfiles`)
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON document per scope in the data directory
//! - [`memory::InMemoryStore`]: no persistence, used by tests
//!
//! ## Consistency
//!
//! Every caller does read-modify-write on whole values with no version check.
//! Two writers staging into the same key interleave as last-write-wins; an
//! update can be lost. Nothing in memo runs two writers at once, so this is
//! left as is.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Sync,
    Local,
}

impl Scope {
    pub fn name(&self) -> &'static str {
        match self {
            Scope::Sync => "sync",
            Scope::Local => "local",
        }
    }
}

/// Abstract interface for the key-value store.
///
/// Methods take `&self`; implementations use interior mutability since memo is
/// single-threaded.
pub trait KeyValueStore {
    /// Read a value, `None` when the key is absent
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>>;

    /// Write a value, replacing whatever was there
    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, scope: Scope, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        (**self).get(scope, key)
    }

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        (**self).set(scope, key, value)
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        (**self).remove(scope, key)
    }
}

/// Read and decode a value, falling back to `T::default()` when absent.
pub fn read_or_default<S, T>(store: &S, scope: Scope, key: &str) -> Result<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    match store.get(scope, key)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Encode and write a value.
pub fn write_value<S, T>(store: &S, scope: Scope, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(scope, key, serde_json::to_value(value)?)
}
