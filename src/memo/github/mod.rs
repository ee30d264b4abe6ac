//! # GitHub Remote
//!
//! Talks to the GitHub REST API with a single static credential
//! (`Authorization: Basic base64(username:token)`). There is no token refresh
//! and no retry: a failed call surfaces as [`crate::error::MemoError::Remote`]
//! or [`crate::error::MemoError::Http`].
//!
//! Files are read through the contents API and written only through
//! [`GitHubClient::commit_files`], which builds one commit for any number of
//! files from the Git data API:
//!
//! ```text
//! ref ──▶ tip commit ──▶ base tree
//!                          │
//! blobs (concurrent) ──▶ new tree ──▶ commit(parent = tip) ──▶ update ref
//! ```
//!
//! Only the last step moves the branch. If anything fails before it, the
//! objects already created are unreferenced and the branch is untouched.

mod client;
mod commit;
pub mod manifest;

pub use client::{Branch, GitHubClient};
pub use commit::{CommitOutcome, FileChange};
pub use manifest::{merge_content, merge_manifest, Manifest};
