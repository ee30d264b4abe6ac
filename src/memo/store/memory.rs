use super::{KeyValueStore, Scope};
use crate::error::{MemoError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    values: RefCell<HashMap<(Scope, String), Value>>,
    simulate_write_error: RefCell<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(MemoError::Storage("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        self.check_writable()?;
        self.values
            .borrow_mut()
            .insert((scope, key.to_string()), value);
        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values.borrow_mut().remove(&(scope, key.to_string()));
        Ok(())
    }
}
