//! Per-tab session cache of composer state.
//!
//! One cache lives in each tab agent and dies with it; nothing is shared
//! between tabs or persisted. A cached model is only handed back while the tab
//! is still on the URL it was captured from.

use crate::error::{MemoError, Result};
use crate::model::CacheableModel;

#[derive(Debug, Default)]
pub struct SessionCache {
    slot: Option<CacheableModel>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached model, if it was captured on `current_key`.
    ///
    /// A miss is reported as [`MemoError::CacheInvalid`]; callers re-extract.
    pub fn get(&self, current_key: &str) -> Result<CacheableModel> {
        let cached = self
            .slot
            .as_ref()
            .ok_or_else(|| MemoError::CacheInvalid("No cached model found".to_string()))?;

        if cached.cache_key.as_deref() != Some(current_key) {
            return Err(MemoError::CacheInvalid(
                "Cache invalidated due to key change".to_string(),
            ));
        }
        Ok(cached.clone())
    }

    pub fn set(&mut self, model: CacheableModel) {
        self.slot = Some(model);
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_for(key: &str) -> CacheableModel {
        CacheableModel {
            title: Some("Cached".into()),
            cache_key: Some(key.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_cache_misses() {
        let cache = SessionCache::new();
        assert!(matches!(
            cache.get("https://a.test/"),
            Err(MemoError::CacheInvalid(_))
        ));
    }

    #[test]
    fn hit_on_same_page() {
        let mut cache = SessionCache::new();
        cache.set(model_for("https://a.test/1"));
        assert_eq!(
            cache.get("https://a.test/1").unwrap().title.as_deref(),
            Some("Cached")
        );
    }

    #[test]
    fn model_from_another_page_is_invalid() {
        let mut cache = SessionCache::new();
        cache.set(model_for("https://a.test/1"));
        for other in ["https://a.test/2", "https://a.test/1#frag", "https://b.test/1"] {
            assert!(matches!(cache.get(other), Err(MemoError::CacheInvalid(_))));
        }
    }

    #[test]
    fn set_overwrites_and_clear_empties() {
        let mut cache = SessionCache::new();
        cache.set(model_for("https://a.test/1"));
        cache.set(model_for("https://a.test/2"));
        assert!(cache.get("https://a.test/1").is_err());
        assert!(cache.get("https://a.test/2").is_ok());

        cache.clear();
        assert!(cache.get("https://a.test/2").is_err());
    }

    #[test]
    fn model_without_key_never_matches() {
        let mut cache = SessionCache::new();
        cache.set(CacheableModel::default());
        assert!(cache.get("").is_err());
    }
}
