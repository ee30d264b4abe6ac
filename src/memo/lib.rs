//! # Memo Architecture
//!
//! Memo captures a highlighted snippet from a web page, turns it into a one-line
//! markdown note and commits it to a file in a GitHub repository. It is a
//! **UI-agnostic library**: the browser (tabs, DOM, extension storage) and the
//! terminal are both clients that plug into the same seams.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (CLI in main.rs + cli/, or a browser shell)        │
//! │  - Implement ComposerView, Tabs and KeyValueStore           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Capture pipeline (relay.rs, controller.rs, note.rs)        │
//! │  - Background router, per-tab agent, composer controller    │
//! │  - Typed commands, typed observers                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API + Command layer (api.rs, commands/*.rs)                │
//! │  - Stage, unstage, status, save, settings                   │
//! │  - Returns structured Result types, never prints            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  Storage (store/)            │ │  Remote (github/)          │
//! │  - KeyValueStore, two scopes │ │  - Contents + Git data API │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! ## Staging and committing
//!
//! Notes are never written to the remote one by one. They accumulate in the
//! local *working area* (per target file, most recent first) and a save turns
//! everything staged, plus any new tag and file suggestions for the manifest,
//! into a single commit built from blobs, a tree and a ref update.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade used by clients
//! - [`commands`]: Staging engine and settings commands
//! - [`controller`]: Composer controller driving a [`note::NoteModel`]
//! - [`relay`]: Typed messages between background, tab and composer
//! - [`metadata`]: Page title / canonical link extraction
//! - [`cache`]: Per-tab session cache
//! - [`entry`]: Note entry text format
//! - [`github`]: GitHub REST client and commit construction
//! - [`store`]: Key-value storage abstraction and implementations
//! - [`options`]: Synced user settings
//! - [`config`]: Client configuration file
//! - [`model`]: Core data types
//! - [`error`]: Error types

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod github;
pub mod metadata;
pub mod model;
pub mod note;
pub mod options;
pub mod relay;
pub mod store;
