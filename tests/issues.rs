use github_tools::client::{ListIssuesParams, Page, StateFilter};
use github_tools::{Config, GitHubClient, Request, Server};
use httpmock::{Method::GET, Method::PATCH, Method::POST, MockServer};
use serde_json::{json, Map, Value};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(Config::new("t").with_base_url(server.base_url())).unwrap()
}

fn params(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn list_issues_applies_defaults() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/o/r/issues")
                .query_param("state", "open")
                .query_param("per_page", "30")
                .query_param("page", "1");
            then.status(200).json_body(json!([{ "number": 1 }]));
        })
        .await;

    let params = ListIssuesParams {
        owner: "o".into(),
        repo: "r".into(),
        ..Default::default()
    };
    let issues = client(&server).list_issues(&params).await.unwrap();
    assert_eq!(issues[0]["number"], 1);
    m.assert_async().await;
}

#[tokio::test]
async fn list_issues_joins_labels_and_forwards_filters() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/o/r/issues")
                .query_param("state", "closed")
                .query_param("labels", "bug,ui")
                .query_param("sort", "updated")
                .query_param("direction", "asc")
                .query_param("per_page", "5")
                .query_param("page", "2");
            then.status(200).json_body(json!([]));
        })
        .await;

    let params = ListIssuesParams {
        owner: "o".into(),
        repo: "r".into(),
        state: Some(StateFilter::Closed),
        labels: Some(vec!["bug".into(), "ui".into()]),
        sort: Some("updated".into()),
        direction: Some("asc".into()),
        page: Page::new(Some(5), Some(2)),
    };
    client(&server).list_issues(&params).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn close_issue_patches_state() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/repos/o/r/issues/9")
                .json_body(json!({ "state": "closed" }));
            then.status(200).json_body(json!({ "number": 9, "state": "closed" }));
        })
        .await;

    let issue = client(&server).close_issue("o", "r", 9).await.unwrap();
    assert_eq!(issue["state"], "closed");
    m.assert_async().await;
}

#[tokio::test]
async fn create_issue_body_omits_locators() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/repos/o/r/issues")
                .json_body(json!({ "title": "Crash on start", "labels": ["bug"] }));
            then.status(201).json_body(json!({ "number": 12 }));
        })
        .await;

    let resp = Server::with_client(client(&server))
        .handle_request(Request::new(
            "github_create_issue",
            params(json!({
                "owner": "o",
                "repo": "r",
                "title": "Crash on start",
                "labels": ["bug"]
            })),
        ))
        .await;
    assert!(resp.is_success());
    assert_eq!(resp.data().unwrap()["number"], 12);
    m.assert_async().await;
}

#[tokio::test]
async fn missing_title_is_invalid_params() {
    let server = MockServer::start_async().await;
    let resp = Server::with_client(client(&server))
        .handle_request(Request::new(
            "github_create_issue",
            params(json!({ "owner": "o", "repo": "r" })),
        ))
        .await;
    let err = resp.error().unwrap();
    assert_eq!(err.code, "INVALID_PARAMS");
    assert_eq!(err.message, "Missing required parameter(s): title");
}
