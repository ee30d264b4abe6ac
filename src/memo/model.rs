use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Staged entries per target file, most recent first.
pub type WorkingArea = BTreeMap<String, Vec<String>>;

/// The part of the composer state that survives a composer close, keyed by page.
///
/// `cache_key` is the navigated URL of the page the model was captured on. The
/// cached copy is only meaningful while the tab is still on that URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheableModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    New,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Valid,
    Error,
}

/// Everything the composer shows and edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullModel {
    pub title: Option<String>,
    pub href: Option<String>,
    pub cache_key: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub filename: String,
    /// Known tags, loaded from the manifest
    pub tag_options: Vec<String>,
    /// Tags typed in this composer that the manifest does not know yet
    pub new_tag_options: Vec<String>,
    /// Known target files, loaded from the manifest
    pub file_options: Vec<String>,
    pub new_file_options: Vec<String>,
    pub library_url: Option<String>,
    pub save_status: SaveStatus,
    pub connection_status: ConnectionStatus,
}

impl FullModel {
    pub fn cacheable(&self) -> CacheableModel {
        CacheableModel {
            filename: Some(self.filename.clone()),
            title: self.title.clone(),
            href: self.href.clone(),
            cache_key: self.cache_key.clone(),
            description: Some(self.description.clone()),
            tags: Some(self.tags.clone()),
        }
    }
}

/// Tag and file values pending a merge into the remote manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTagFileOptions {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl NewTagFileOptions {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.files.is_empty()
    }

    pub fn extend(&mut self, tags: &[String], files: &[String]) {
        self.tags.extend_from_slice(tags);
        self.files.extend_from_slice(files);
    }
}
