use super::{KeyValueStore, Scope};
use crate::error::{MemoError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// File-backed store: `<root>/sync.json` and `<root>/local.json`, each a JSON
/// object mapping keys to values.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn scope_file(&self, scope: Scope) -> PathBuf {
        self.root.join(format!("{}.json", scope.name()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(MemoError::Io)?;
        }
        Ok(())
    }

    fn load_scope(&self, scope: Scope) -> Result<Map<String, Value>> {
        let path = self.scope_file(scope);
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&path).map_err(MemoError::Io)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(MemoError::Storage(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    fn save_scope(&self, scope: Scope, values: &Map<String, Value>) -> Result<()> {
        self.ensure_dir()?;
        let path = self.scope_file(scope);
        let content = serde_json::to_string_pretty(values).map_err(MemoError::Serialization)?;

        // Atomic write
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", scope.name(), std::process::id()));
        fs::write(&tmp_path, content).map_err(MemoError::Io)?;
        fs::rename(&tmp_path, &path).map_err(MemoError::Io)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>> {
        let mut values = self.load_scope(scope)?;
        Ok(values.remove(key))
    }

    fn set(&self, scope: Scope, key: &str, value: Value) -> Result<()> {
        let mut values = self.load_scope(scope)?;
        values.insert(key.to_string(), value);
        self.save_scope(scope, &values)
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        let mut values = self.load_scope(scope)?;
        if values.remove(key).is_some() {
            self.save_scope(scope, &values)?;
        }
        Ok(())
    }
}
