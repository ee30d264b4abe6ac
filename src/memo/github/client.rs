use super::manifest::{merge_content, merge_manifest, Manifest};
use crate::config::MemoConfig;
use crate::error::{MemoError, Result};
use crate::model::NewTagFileOptions;
use crate::options::UserOptions;
use base64::prelude::*;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const GITHUB_WEB_URL: &str = "https://github.com";

/// Response of the contents API for a single file.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct FileContents {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    pub name: String,
}

/// Client for one repository of one user.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    repo: String,
    pub(super) branch: String,
    authorization: String,
}

impl GitHubClient {
    pub fn new(config: &MemoConfig, options: &UserOptions) -> Result<Self> {
        if !options.has_credentials() {
            return Err(MemoError::Config(
                "GitHub access is not configured (set access-token, username and repo)"
                    .to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        let credentials = format!("{}:{}", options.username, options.access_token);

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            username: options.username.clone(),
            repo: options.repo.clone(),
            branch: config.branch.clone(),
            authorization: format!("Basic {}", BASE64_STANDARD.encode(credentials)),
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// `{api}/repos/{user}/{repo}/{segments...}`, each segment percent-encoded.
    pub(super) fn repo_endpoint<'a, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| MemoError::Config(format!("Invalid api-url {}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MemoError::Config(format!("api-url cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.username.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    pub(super) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/vnd.github+json")
    }

    /// Send a request and decode a JSON body, mapping non-2xx to `Remote`.
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status.as_u16(), "GitHub request failed");
            return Err(MemoError::Remote {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Read a file through the contents API. `None` when it does not exist.
    pub(super) async fn get_contents(&self, path: &str) -> Result<Option<FileContents>> {
        if path.is_empty() {
            return Err(MemoError::Validation("File path is empty".to_string()));
        }
        let url = self.repo_endpoint(std::iter::once("contents").chain(path.split('/')))?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(path, "file does not exist yet");
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoError::Remote {
                operation: "read-file-content",
                status: status.as_u16(),
                body,
            });
        }
        Ok(Some(response.json().await?))
    }

    /// Decoded body of a file, empty when the file does not exist.
    pub async fn get_content_string(&self, path: &str) -> Result<String> {
        match self.get_contents(path).await? {
            Some(contents) => decode_content(contents.content.as_deref().unwrap_or_default()),
            None => Ok(String::new()),
        }
    }

    /// Current body of `path` with `content` put on top.
    pub async fn get_merged_content(&self, path: &str, content: &str) -> Result<String> {
        let previous = self.get_content_string(path).await?;
        Ok(merge_content(content, &previous))
    }

    /// Current manifest at `path` with the pending tags and files appended.
    pub async fn get_merged_json(&self, path: &str, new: &NewTagFileOptions) -> Result<String> {
        let existing = self.get_content_string(path).await?;
        merge_manifest(&existing, new)
    }

    pub async fn load_manifest(&self, path: &str) -> Result<Manifest> {
        let text = self.get_content_string(path).await?;
        Manifest::parse(&text)
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>> {
        let url = self.repo_endpoint(["branches"])?;
        self.send_json("list-branches", self.request(Method::GET, url))
            .await
    }

    /// First branch GitHub lists for the repository.
    pub async fn default_branch(&self) -> Result<Option<String>> {
        Ok(self.list_branches().await?.into_iter().next().map(|b| b.name))
    }

    /// Browser link to `path` on the default branch, through the GitHub login
    /// page so private repositories work after sign-in.
    pub async fn library_url(&self, path: &str) -> Result<Option<String>> {
        let Some(branch) = self.default_branch().await? else {
            return Ok(None);
        };
        let target = format!(
            "{}/{}/{}/blob/{}/{}",
            GITHUB_WEB_URL, self.username, self.repo, branch, path
        );
        let return_to: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        Ok(Some(format!("{}/login?return_to={}", GITHUB_WEB_URL, return_to)))
    }
}

/// Contents API bodies are base64 with embedded line breaks.
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|e| MemoError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| MemoError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GitHubClient {
        let config = MemoConfig {
            api_url: api_url.to_string(),
            ..Default::default()
        };
        let options = UserOptions {
            access_token: "token".into(),
            username: "octo".into(),
            repo: "wiki".into(),
            ..Default::default()
        };
        GitHubClient::new(&config, &options).unwrap()
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let result = GitHubClient::new(&MemoConfig::default(), &UserOptions::default());
        assert!(matches!(result, Err(MemoError::Config(_))));
    }

    #[test]
    fn basic_auth_header_encodes_username_and_token() {
        assert_eq!(client("https://api.github.com").authorization, "Basic b2N0bzp0b2tlbg==");
    }

    #[test]
    fn endpoints_keep_api_prefix_and_encode_segments() {
        let c = client("https://ghe.example.com/api/v3/");
        let url = c
            .repo_endpoint(std::iter::once("contents").chain("wiki/my notes.md".split('/')))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octo/wiki/contents/wiki/my%20notes.md"
        );
    }

    #[test]
    fn decode_handles_line_wrapped_base64() {
        assert_eq!(decode_content("aGVs\nbG8g\nd29y\nbGQ=\n").unwrap(), "hello world");
        assert_eq!(decode_content("").unwrap(), "");
        assert!(decode_content("***").is_err());
    }
}
