use github_tools::{Config, GitHubClient, Request, Server};
use httpmock::{Method::GET, Method::PUT, MockServer};
use serde_json::{json, Map, Value};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(Config::new("t").with_base_url(server.base_url())).unwrap()
}

fn params(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn get_repository_sends_auth_and_version_headers() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/o/r")
                .header("authorization", "Bearer t")
                .header("x-github-api-version", "2022-11-28")
                .header("accept", "application/vnd.github+json");
            then.status(200).json_body(json!({ "full_name": "o/r", "private": false }));
        })
        .await;

    let repo = client(&server).get_repository("o", "r").await.unwrap();
    assert_eq!(repo["full_name"], "o/r");
    m.assert_async().await;
}

#[tokio::test]
async fn not_found_is_normalized_with_upstream_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/missing");
            then.status(404).json_body(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            }));
        })
        .await;

    let err = client(&server).get_repository("o", "missing").await.unwrap_err();
    assert_eq!(err.code(), "HTTP_404");
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "Not Found");
    assert_eq!(
        err.details().and_then(|d| d.get("documentation_url")),
        Some(&json!("https://docs.github.com/rest"))
    );
}

#[tokio::test]
async fn list_repositories_defaults_to_first_hundred() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/octocat/repos")
                .query_param("per_page", "100")
                .query_param("page", "1");
            then.status(200).json_body(json!([{ "name": "hello-world" }]));
        })
        .await;

    let repos = client(&server).list_repositories("octocat").await.unwrap();
    assert_eq!(repos[0]["name"], "hello-world");
    m.assert_async().await;
}

#[tokio::test]
async fn replace_topics_sends_names() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/repos/o/r/topics")
                .json_body(json!({ "names": ["rust", "cli"] }));
            then.status(200).json_body(json!({ "names": ["rust", "cli"] }));
        })
        .await;

    let topics = ["rust".to_string(), "cli".to_string()];
    client(&server)
        .replace_repository_topics("o", "r", &topics)
        .await
        .unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn code_frequency_pending_stats_are_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/stats/code_frequency");
            then.status(202);
        })
        .await;

    let stats = client(&server).get_code_frequency_stats("o", "r").await.unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn code_frequency_accepted_with_object_body_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/stats/code_frequency");
            then.status(202).json_body(json!({}));
        })
        .await;

    let stats = client(&server).get_code_frequency_stats("o", "r").await.unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn code_frequency_weeks_become_records() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/stats/code_frequency");
            then.status(200).json_body(json!([[1302998400, 1124, -435]]));
        })
        .await;

    let stats = client(&server).get_code_frequency_stats("o", "r").await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].week, 1302998400);
    assert_eq!(stats[0].additions, 1124);
    assert_eq!(stats[0].deletions, -435);
}

#[tokio::test]
async fn dispatch_succeeds_through_server() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r");
            then.status(200).json_body(json!({ "full_name": "o/r" }));
        })
        .await;

    let dispatch = Server::with_client(client(&server));
    let resp = dispatch
        .handle_request(Request::new(
            "github_get_repository",
            params(json!({ "owner": "o", "repo": "r" })),
        ))
        .await;
    assert!(resp.is_success());
    assert_eq!(resp.data().unwrap()["full_name"], "o/r");
    assert!(resp.error().is_none());
}

#[tokio::test]
async fn invalid_params_never_reach_upstream() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({}));
        })
        .await;

    let dispatch = Server::with_client(client(&server));
    let resp = dispatch
        .handle_request(Request::new(
            "github_get_issue",
            params(json!({ "owner": "o", "repo": "r", "issue_number": "seven" })),
        ))
        .await;
    let err = resp.error().unwrap();
    assert_eq!(err.code, "INVALID_PARAMS");
    assert_eq!(m.hits_async().await, 0);
}

#[tokio::test]
async fn void_operation_returns_null_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::DELETE).path("/repos/o/r");
            then.status(204);
        })
        .await;

    let dispatch = Server::with_client(client(&server));
    let resp = dispatch
        .handle_request(Request::new(
            "github_delete_repository",
            params(json!({ "owner": "o", "repo": "r" })),
        ))
        .await;
    assert!(resp.is_success());
    assert_eq!(resp.data(), Some(&Value::Null));
}
