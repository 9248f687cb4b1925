use github_tools::client::UploadAssetParams;
use github_tools::{Config, GitHubClient};
use httpmock::{Method::POST, MockServer};
use serde_json::json;

fn enterprise_client(server: &MockServer) -> GitHubClient {
    let base = format!("{}/api/v3", server.base_url());
    GitHubClient::new(Config::new("t").with_base_url(base)).unwrap()
}

fn asset(label: Option<&str>, content_type: Option<&str>) -> UploadAssetParams {
    UploadAssetParams {
        owner: "o".into(),
        repo: "r".into(),
        release_id: 5,
        name: "a.txt".into(),
        label: label.map(str::to_string),
        data: "hello asset".into(),
        content_type: content_type.map(str::to_string),
    }
}

#[tokio::test]
async fn upload_goes_to_upload_host_as_octet_stream() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/uploads/repos/o/r/releases/5/assets")
                .query_param("name", "a.txt")
                .header("content-type", "application/octet-stream")
                .header("authorization", "Bearer t")
                .body("hello asset");
            then.status(201).json_body(json!({ "id": 99, "name": "a.txt" }));
        })
        .await;

    let uploaded = enterprise_client(&server)
        .upload_release_asset(&asset(None, None))
        .await
        .unwrap();
    assert_eq!(uploaded["id"], 99);
    m.assert_async().await;
}

#[tokio::test]
async fn upload_forwards_label_and_content_type() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/uploads/repos/o/r/releases/5/assets")
                .query_param("name", "a.txt")
                .query_param("label", "Notes")
                .header("content-type", "text/plain");
            then.status(201).json_body(json!({ "id": 100, "label": "Notes" }));
        })
        .await;

    enterprise_client(&server)
        .upload_release_asset(&asset(Some("Notes"), Some("text/plain")))
        .await
        .unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn upload_never_touches_api_host() {
    let server = MockServer::start_async().await;
    let api = server
        .mock_async(|when, then| {
            when.path_contains("/api/v3/");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/uploads/repos/o/r/releases/5/assets");
            then.status(422).json_body(json!({ "message": "Validation Failed" }));
        })
        .await;

    let err = enterprise_client(&server)
        .upload_release_asset(&asset(None, None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "HTTP_422");
    assert_eq!(err.message(), "Validation Failed");
    assert_eq!(api.hits_async().await, 0);
}
