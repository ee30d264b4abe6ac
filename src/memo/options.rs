//! Synced user settings.
//!
//! Each setting is its own key in [`Scope::Sync`] so that a partial update
//! touches only the keys it names.

use crate::error::{MemoError, Result};
use crate::store::{KeyValueStore, Scope};
use serde_json::Value;

pub const DEFAULT_PLACE: &str = "home";
pub const DEFAULT_MANIFEST: &str = "manifest.json";

const KEY_ACCESS_TOKEN: &str = "accessToken";
const KEY_USERNAME: &str = "username";
const KEY_REPO: &str = "repo";
const KEY_PLACE: &str = "place";
const KEY_MANIFEST: &str = "manifest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOptions {
    pub access_token: String,
    pub username: String,
    pub repo: String,
    /// Where the notes were taken, used in the commit message
    pub place: String,
    /// Path of the tag/file suggestions manifest inside the repository
    pub manifest: String,
}

impl Default for UserOptions {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            username: String::new(),
            repo: String::new(),
            place: DEFAULT_PLACE.to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
        }
    }
}

/// A partial settings update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserOptionsUpdate {
    pub access_token: Option<String>,
    pub username: Option<String>,
    pub repo: Option<String>,
    pub place: Option<String>,
    pub manifest: Option<String>,
}

impl UserOptionsUpdate {
    /// Build a single-key update from a CLI style key (`access-token`, `repo`, ...).
    pub fn from_key(key: &str, value: impl Into<String>) -> Result<Self> {
        let value = Some(value.into());
        let mut update = Self::default();
        match key {
            "access-token" | "accessToken" => update.access_token = value,
            "username" => update.username = value,
            "repo" => update.repo = value,
            "place" => update.place = value,
            "manifest" => update.manifest = value,
            other => {
                return Err(MemoError::Config(format!("Unknown setting: {}", other)));
            }
        }
        Ok(update)
    }
}

impl UserOptions {
    pub const KEYS: [&'static str; 5] = ["access-token", "username", "repo", "place", "manifest"];

    /// Display value for a CLI style key. The token is masked.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "access-token" | "accessToken" => Some(mask_token(&self.access_token)),
            "username" => Some(self.username.clone()),
            "repo" => Some(self.repo.clone()),
            "place" => Some(self.place.clone()),
            "manifest" => Some(self.manifest.clone()),
            _ => None,
        }
    }

    /// All of token, username and repo are needed to talk to the remote.
    pub fn has_credentials(&self) -> bool {
        !self.access_token.is_empty() && !self.username.is_empty() && !self.repo.is_empty()
    }
}

fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let count = token.chars().count();
    let visible: String = token.chars().skip(count.saturating_sub(4)).collect();
    format!("****{}", visible)
}

fn read_string<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: &str) -> Result<String> {
    match store.get(Scope::Sync, key)? {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Ok(default.to_string()),
        Some(other) => Err(MemoError::Storage(format!(
            "Setting {} is not a string: {}",
            key, other
        ))),
    }
}

pub fn get_user_options<S: KeyValueStore + ?Sized>(store: &S) -> Result<UserOptions> {
    Ok(UserOptions {
        access_token: read_string(store, KEY_ACCESS_TOKEN, "")?,
        username: read_string(store, KEY_USERNAME, "")?,
        repo: read_string(store, KEY_REPO, "")?,
        place: read_string(store, KEY_PLACE, DEFAULT_PLACE)?,
        manifest: read_string(store, KEY_MANIFEST, DEFAULT_MANIFEST)?,
    })
}

pub fn set_user_options<S: KeyValueStore + ?Sized>(
    store: &S,
    update: &UserOptionsUpdate,
) -> Result<()> {
    let fields = [
        (KEY_ACCESS_TOKEN, &update.access_token),
        (KEY_USERNAME, &update.username),
        (KEY_REPO, &update.repo),
        (KEY_PLACE, &update.place),
        (KEY_MANIFEST, &update.manifest),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            store.set(Scope::Sync, key, Value::String(value.clone()))?;
        }
    }
    Ok(())
}
