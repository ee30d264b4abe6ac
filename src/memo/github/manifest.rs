//! The manifest file: known tags and target files, plus whatever else the
//! repository owner keeps in it.

use crate::error::{MemoError, Result};
use crate::model::NewTagFileOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest text. An empty file is an empty manifest.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Append pending values. No deduplication.
    pub fn merge(&mut self, new: &NewTagFileOptions) {
        self.tags.extend(new.tags.iter().cloned());
        self.files.extend(new.files.iter().cloned());
    }

    /// Serialize with 4-space indentation.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| MemoError::Decode(e.to_string()))
    }
}

/// Put `new_content` on top of `previous`, separated by one line break.
pub fn merge_content(new_content: &str, previous: &str) -> String {
    format!("{}\n{}", new_content, previous)
}

/// Merge pending tags/files into manifest text and re-serialize it.
pub fn merge_manifest(existing: &str, new: &NewTagFileOptions) -> Result<String> {
    let mut manifest = Manifest::parse(existing)?;
    manifest.merge(new);
    manifest.to_pretty_string()
}
