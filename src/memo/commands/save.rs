use super::helpers::{clear_staged, load_new_tag_files, load_working_area};
use super::{CmdMessage, CmdResult};
use crate::config::MemoConfig;
use crate::error::{MemoError, Result};
use crate::github::{FileChange, GitHubClient};
use crate::options::UserOptions;
use crate::store::KeyValueStore;
use futures::future::try_join_all;

/// Commit message for a save made at `place`.
pub fn commit_message(place: &str) -> String {
    format!("Summary links added @{}", place)
}

/// Publish everything staged as a single commit.
///
/// Every staged file gets its entries (most recent first) put on top of its
/// current remote body; the manifest is rewritten when tags or files are
/// pending. Local staged state is removed only after the branch moved. On any
/// failure it stays as it was so the save can be retried.
pub async fn run<S: KeyValueStore + ?Sized>(
    store: &S,
    config: &MemoConfig,
    options: &UserOptions,
) -> Result<CmdResult> {
    let area = load_working_area(store)?;
    let pending = load_new_tag_files(store)?;
    let mut result = CmdResult::default();

    if area.is_empty() && pending.is_empty() {
        result.add_message(CmdMessage::info("Nothing staged."));
        return Ok(result);
    }

    if area.contains_key(&options.manifest) {
        return Err(MemoError::Validation(format!(
            "Notes are staged for the manifest file {}; unstage them before saving",
            options.manifest
        )));
    }

    let client = GitHubClient::new(config, options)?;

    let mut changes = try_join_all(area.iter().map(|(path, entries)| {
        let client = &client;
        async move {
            let merged = client.get_merged_content(path, &entries.join("\n")).await?;
            Ok::<_, MemoError>(FileChange::new(path.clone(), merged))
        }
    }))
    .await?;

    if !pending.is_empty() {
        let manifest = client.get_merged_json(&options.manifest, &pending).await?;
        changes.push(FileChange::new(options.manifest.clone(), manifest));
    }

    tracing::info!(files = changes.len(), branch = client.branch(), "saving staged notes");
    let outcome = client
        .commit_files(&changes, &commit_message(&options.place))
        .await?;

    clear_staged(store)?;

    let entries: usize = area.values().map(Vec::len).sum();
    result.add_message(CmdMessage::success(format!(
        "Saved {} entr{} to {} file{} ({})",
        entries,
        if entries == 1 { "y" } else { "ies" },
        changes.len(),
        if changes.len() == 1 { "" } else { "s" },
        short_sha(&outcome.sha)
    )));
    Ok(result.with_commit_sha(outcome.sha))
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
