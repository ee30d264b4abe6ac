#![allow(dead_code)]

use base64::prelude::*;
use memo::config::MemoConfig;
use memo::options::{set_user_options, UserOptions, UserOptionsUpdate};
use memo::store::KeyValueStore;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO: &str = "/repos/octo/wiki";
pub const TIP: &str = "tip0000000000000000000000000000000000000";
pub const BASE_TREE: &str = "basetree000000000000000000000000000000000";
pub const NEW_TREE: &str = "newtree0000000000000000000000000000000000";
pub const NEW_COMMIT: &str = "c0ffee0000000000000000000000000000000000";

pub fn options() -> UserOptions {
    UserOptions {
        access_token: "token".into(),
        username: "octo".into(),
        repo: "wiki".into(),
        ..Default::default()
    }
}

pub fn config(server: &MockServer) -> MemoConfig {
    MemoConfig {
        api_url: server.uri(),
        ..Default::default()
    }
}

pub fn store_credentials<S: KeyValueStore + ?Sized>(store: &S) {
    let o = options();
    set_user_options(
        store,
        &UserOptionsUpdate {
            access_token: Some(o.access_token),
            username: Some(o.username),
            repo: Some(o.repo),
            ..Default::default()
        },
    )
    .unwrap();
}

pub fn repo_path(rest: &str) -> String {
    format!("{}/{}", REPO, rest)
}

/// Contents API response for a file body.
pub fn contents(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "type": "file",
        "encoding": "base64",
        "sha": "f11e",
        "content": BASE64_STANDARD.encode(body),
    }))
}

pub async fn mount_file(server: &MockServer, file: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("contents/{}", file))))
        .respond_with(contents(body))
        .mount(server)
        .await;
}

pub async fn mount_missing_file(server: &MockServer, file: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("contents/{}", file))))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(server)
        .await;
}

/// Ref and tree reads for a branch whose tip is [`TIP`].
pub async fn mount_branch_head(server: &MockServer, branch: &str) {
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("git/ref/heads/{}", branch))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": format!("refs/heads/{}", branch),
            "object": {"sha": TIP, "type": "commit"},
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(repo_path(&format!("git/trees/{}", TIP))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": BASE_TREE,
            "tree": [],
        })))
        .mount(server)
        .await;
}

/// Blob, tree and commit creation, each answering with a fixed sha.
pub async fn mount_object_creation(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(repo_path("git/blobs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "b10b"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(repo_path("git/trees")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": NEW_TREE})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(repo_path("git/commits")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": NEW_COMMIT})))
        .mount(server)
        .await;
}

pub async fn mount_ref_update(server: &MockServer, branch: &str, status: u16) {
    let response = if status < 300 {
        ResponseTemplate::new(status).set_body_json(json!({
            "ref": format!("refs/heads/{}", branch),
            "object": {"sha": NEW_COMMIT, "type": "commit"},
        }))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({"message": "Update is not a fast forward"}))
    };
    Mock::given(method("PATCH"))
        .and(path(repo_path(&format!("git/refs/heads/{}", branch))))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// JSON bodies of every request matching `verb` and `suffix`, in arrival order.
pub async fn request_bodies(
    server: &MockServer,
    verb: &str,
    suffix: &str,
) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == repo_path(suffix))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}
