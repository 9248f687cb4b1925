use github_tools::client::CreateBranchParams;
use github_tools::{Config, GitHubClient};
use httpmock::{Method::GET, Method::POST, MockServer};
use serde_json::json;

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(Config::new("t").with_base_url(server.base_url())).unwrap()
}

fn branch(sha: Option<&str>, from_branch: Option<&str>) -> CreateBranchParams {
    CreateBranchParams {
        owner: "o".into(),
        repo: "r".into(),
        branch: "feature".into(),
        sha: sha.map(str::to_string),
        from_branch: from_branch.map(str::to_string),
    }
}

#[tokio::test]
async fn explicit_sha_skips_lookups() {
    let server = MockServer::start_async().await;
    let lookups = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(500);
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/o/r/git/refs")
                .json_body(json!({ "ref": "refs/heads/feature", "sha": "abc123" }));
            then.status(201).json_body(json!({ "ref": "refs/heads/feature" }));
        })
        .await;

    let created = client(&server)
        .create_branch(&branch(Some("abc123"), Some("develop")))
        .await
        .unwrap();
    assert_eq!(created["ref"], "refs/heads/feature");
    create.assert_async().await;
    assert_eq!(lookups.hits_async().await, 0);
}

#[tokio::test]
async fn from_branch_resolves_its_tip() {
    let server = MockServer::start_async().await;
    let tip = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/branches/develop");
            then.status(200)
                .json_body(json!({ "name": "develop", "commit": { "sha": "dev999" } }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/o/r/git/refs")
                .json_body(json!({ "ref": "refs/heads/feature", "sha": "dev999" }));
            then.status(201).json_body(json!({ "ref": "refs/heads/feature" }));
        })
        .await;

    client(&server)
        .create_branch(&branch(None, Some("develop")))
        .await
        .unwrap();
    tip.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn default_branch_is_used_when_nothing_given() {
    let server = MockServer::start_async().await;
    let repo = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r");
            then.status(200).json_body(json!({ "default_branch": "trunk" }));
        })
        .await;
    let tip = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/branches/trunk");
            then.status(200)
                .json_body(json!({ "name": "trunk", "commit": { "sha": "main42" } }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/o/r/git/refs")
                .json_body(json!({ "ref": "refs/heads/feature", "sha": "main42" }));
            then.status(201).json_body(json!({ "ref": "refs/heads/feature" }));
        })
        .await;

    client(&server).create_branch(&branch(None, None)).await.unwrap();
    repo.assert_async().await;
    tip.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn missing_source_branch_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/branches/gone");
            then.status(404).json_body(json!({ "message": "Branch not found" }));
        })
        .await;

    let err = client(&server)
        .create_branch(&branch(None, Some("gone")))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "HTTP_404");
    assert_eq!(err.message(), "Branch not found");
}
