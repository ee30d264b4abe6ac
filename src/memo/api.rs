//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for
//! everything outside the capture pipeline: listing, unstaging, saving and
//! settings. It dispatches to `commands/*.rs` and returns `Result<CmdResult>`;
//! it never prints and holds no business logic.
//!
//! `MemoApi<S: KeyValueStore>` is generic over the store:
//! - Production: `MemoApi<Rc<FileStore>>`
//! - Testing: `MemoApi<InMemoryStore>`
//!
//! Client configuration is loaded once when the API is built. Settings changes
//! made through [`MemoApi::settings`] go to disk and take effect on the next
//! run.

use crate::commands;
use crate::config::MemoConfig;
use crate::error::Result;
use crate::model::FullModel;
use crate::options::get_user_options;
use crate::store::KeyValueStore;
use std::path::{Path, PathBuf};

pub struct MemoApi<S: KeyValueStore> {
    store: S,
    config: MemoConfig,
    data_dir: PathBuf,
}

impl<S: KeyValueStore> MemoApi<S> {
    /// Build an API over `store`, with client configuration read from `data_dir`.
    pub fn new(store: S, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let config = MemoConfig::load(&data_dir)?;
        Ok(Self {
            store,
            config,
            data_dir,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MemoConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(&self.store)
    }

    pub fn stage(&self, model: &FullModel, form_valid: bool) -> StageOutcome {
        commands::stage::run(&self.store, model, form_valid)
    }

    pub fn unstage(&self, filename: &str, index: usize) -> Result<commands::CmdResult> {
        commands::unstage::run(&self.store, filename, index)
    }

    pub fn forget(&self, kind: PendingKind, index: usize) -> Result<commands::CmdResult> {
        commands::forget::run(&self.store, kind, index)
    }

    pub fn clear(&self) -> Result<commands::CmdResult> {
        commands::clear::run(&self.store)
    }

    pub async fn save(&self) -> Result<commands::CmdResult> {
        let options = get_user_options(&self.store)?;
        commands::save::run(&self.store, &self.config, &options).await
    }

    pub fn settings(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.store, &self.data_dir, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::forget::PendingKind;
pub use crate::commands::stage::StageOutcome;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
