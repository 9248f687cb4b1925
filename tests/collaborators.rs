use github_tools::{Config, GitHubClient};
use httpmock::{Method::GET, MockServer};
use serde_json::json;

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(Config::new("t").with_base_url(server.base_url())).unwrap()
}

async fn check_with_status(status: u16) -> github_tools::ApiResult<bool> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/collaborators/alice");
            then.status(status);
        })
        .await;
    client(&server).check_collaborator("o", "r", "alice").await
}

#[tokio::test]
async fn collaborator_check_maps_status_to_bool() {
    assert!(check_with_status(204).await.unwrap());
    assert!(!check_with_status(404).await.unwrap());
}

#[tokio::test]
async fn collaborator_check_surfaces_other_failures() {
    let err = check_with_status(500).await.unwrap_err();
    assert_eq!(err.code(), "HTTP_500");
    assert_eq!(err.message(), "GitHub API request failed");
}

#[tokio::test]
async fn permission_level_is_extracted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/o/r/collaborators/alice/permission");
            then.status(200)
                .json_body(json!({ "permission": "write", "user": { "login": "alice" } }));
        })
        .await;

    let level = client(&server)
        .get_collaborator_permission("o", "r", "alice")
        .await
        .unwrap();
    assert_eq!(level, "write");
}

#[tokio::test]
async fn team_without_access_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/orgs/o/teams/devs/repos/o/r");
            then.status(404);
        })
        .await;

    let perms = client(&server)
        .check_team_permission("o", "r", "devs")
        .await
        .unwrap();
    assert!(perms.is_none());
}

#[tokio::test]
async fn team_with_access_returns_repository() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/orgs/o/teams/devs/repos/o/r")
                .header("accept", "application/vnd.github.v3.repository+json");
            then.status(200)
                .json_body(json!({ "full_name": "o/r", "permissions": { "push": true } }));
        })
        .await;

    let perms = client(&server)
        .check_team_permission("o", "r", "devs")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(perms["permissions"]["push"], true);
    m.assert_async().await;
}
