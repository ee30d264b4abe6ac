use super::client::GitHubClient;
use crate::error::{MemoError, Result};
use futures::future::try_join_all;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

const FILE_MODE: &str = "100644";

/// A whole-file write: `content` replaces whatever is at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

impl FileChange {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub sha: String,
    pub parent: String,
    pub tree: String,
}

#[derive(Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Deserialize)]
struct Sha {
    sha: String,
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    sha: String,
}

impl GitHubClient {
    /// Write all `files` to the branch as a single commit.
    pub async fn commit_files(&self, files: &[FileChange], message: &str) -> Result<CommitOutcome> {
        if files.is_empty() {
            return Err(MemoError::Validation("Nothing to commit".to_string()));
        }

        let parent = self.fetch_head().await?;
        let base_tree = self.fetch_tree(&parent).await?;
        tracing::debug!(%parent, %base_tree, files = files.len(), "building commit");

        let blobs = try_join_all(files.iter().map(|file| self.create_blob(&file.content))).await?;
        let entries = files
            .iter()
            .zip(blobs)
            .map(|(file, sha)| TreeEntry {
                path: &file.path,
                mode: FILE_MODE,
                kind: "blob",
                sha,
            })
            .collect::<Vec<_>>();

        let tree = self.create_tree(&base_tree, &entries).await?;
        let sha = self.create_commit(message, &tree, &parent).await?;
        self.update_ref(&sha).await?;

        tracing::info!(%sha, branch = %self.branch, "branch updated");
        Ok(CommitOutcome { sha, parent, tree })
    }

    async fn fetch_head(&self) -> Result<String> {
        let url = self.repo_endpoint(
            ["git", "ref", "heads"]
                .into_iter()
                .chain(self.branch.split('/')),
        )?;
        let head: GitRef = self
            .send_json("read-ref", self.request(Method::GET, url))
            .await?;
        Ok(head.object.sha)
    }

    async fn fetch_tree(&self, commit_sha: &str) -> Result<String> {
        let url = self.repo_endpoint(["git", "trees", commit_sha])?;
        let tree: Sha = self
            .send_json("read-tree", self.request(Method::GET, url))
            .await?;
        Ok(tree.sha)
    }

    async fn create_blob(&self, content: &str) -> Result<String> {
        let url = self.repo_endpoint(["git", "blobs"])?;
        let body = json!({ "content": content, "encoding": "utf-8" });
        let blob: Sha = self
            .send_json("create-blob", self.request(Method::POST, url).json(&body))
            .await?;
        Ok(blob.sha)
    }

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry<'_>]) -> Result<String> {
        let url = self.repo_endpoint(["git", "trees"])?;
        let body = json!({ "base_tree": base_tree, "tree": entries });
        let tree: Sha = self
            .send_json("create-tree", self.request(Method::POST, url).json(&body))
            .await?;
        Ok(tree.sha)
    }

    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String> {
        let url = self.repo_endpoint(["git", "commits"])?;
        let body = json!({ "message": message, "tree": tree, "parents": [parent] });
        let commit: Sha = self
            .send_json("create-commit", self.request(Method::POST, url).json(&body))
            .await?;
        Ok(commit.sha)
    }

    async fn update_ref(&self, sha: &str) -> Result<()> {
        let url = self.repo_endpoint(
            ["git", "refs", "heads"]
                .into_iter()
                .chain(self.branch.split('/')),
        )?;
        let body = json!({ "sha": sha });
        let _: GitRef = self
            .send_json("update-ref", self.request(Method::PATCH, url).json(&body))
            .await?;
        Ok(())
    }
}
