//! # Command Layer
//!
//! Business logic for everything a client can ask of memo, operating on a
//! [`KeyValueStore`](crate::store::KeyValueStore) and, for saving, the GitHub
//! client. Commands return [`CmdResult`] and never print.
//!
//! The staging engine lives here: [`stage`] adds a note to the working area,
//! [`unstage`] takes one out, [`forget`] drops one pending manifest addition,
//! [`status`] lists what is pending, [`save`] turns all of it into one commit
//! and [`clear`] throws it away.

use crate::config::MemoConfig;
use crate::model::{NewTagFileOptions, WorkingArea};
use crate::options::UserOptions;

pub mod clear;
pub mod config;
pub mod forget;
pub mod helpers;
pub mod save;
pub mod stage;
pub mod status;
pub mod unstage;

/// Local store key of the working area.
pub const WORKING_AREA_KEY: &str = "working-area";
/// Local store key of the pending manifest additions.
pub const NEW_TAGFILES_KEY: &str = "new-tagfiles";

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub working_area: Option<WorkingArea>,
    pub new_tag_files: Option<NewTagFileOptions>,
    pub user_options: Option<UserOptions>,
    pub config: Option<MemoConfig>,
    pub commit_sha: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_working_area(mut self, area: WorkingArea) -> Self {
        self.working_area = Some(area);
        self
    }

    pub fn with_new_tag_files(mut self, pending: NewTagFileOptions) -> Self {
        self.new_tag_files = Some(pending);
        self
    }

    pub fn with_settings(mut self, options: UserOptions, config: MemoConfig) -> Self {
        self.user_options = Some(options);
        self.config = Some(config);
        self
    }

    pub fn with_commit_sha(mut self, sha: String) -> Self {
        self.commit_sha = Some(sha);
        self
    }
}
