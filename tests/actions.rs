use github_tools::client::{ListWorkflowRunsParams, WorkflowId};
use github_tools::{Config, GitHubClient, Request, Server};
use httpmock::{Method::GET, Method::POST, MockServer};
use serde_json::{json, Map, Value};
use std::io::Write;
use zip::write::FileOptions;

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(Config::new("t").with_base_url(server.base_url())).unwrap()
}

fn runs(workflow_id: Option<WorkflowId>) -> ListWorkflowRunsParams {
    ListWorkflowRunsParams {
        owner: "o".into(),
        repo: "r".into(),
        workflow_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn repository_runs_are_unwrapped() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/actions/runs");
            then.status(200).json_body(json!({
                "total_count": 2,
                "workflow_runs": [{ "id": 1 }, { "id": 2 }]
            }));
        })
        .await;

    let list = client(&server).list_workflow_runs(&runs(None)).await.unwrap();
    assert_eq!(list, json!([{ "id": 1 }, { "id": 2 }]));
    m.assert_async().await;
}

#[tokio::test]
async fn workflow_runs_use_file_name_and_filters() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/repos/o/r/actions/workflows/ci.yml/runs")
                .query_param("branch", "main")
                .query_param("status", "failure");
            then.status(200).json_body(json!({ "total_count": 0 }));
        })
        .await;

    let mut params = runs(Some(WorkflowId::FileName("ci.yml".into())));
    params.branch = Some("main".into());
    params.status = Some("failure".into());
    let list = client(&server).list_workflow_runs(&params).await.unwrap();
    assert_eq!(list, json!([]));
    m.assert_async().await;
}

#[tokio::test]
async fn rerun_posts_and_returns_nothing() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST).path("/repos/o/r/actions/runs/77/rerun");
            then.status(201);
        })
        .await;

    client(&server).rerun_workflow("o", "r", 77).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn run_logs_follow_redirect_and_expand() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mut zip_bytes: Vec<u8> = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_bytes));
        let options = FileOptions::default();
        writer.add_directory("build/", options)?;
        writer.start_file("build/1_checkout.txt", options)?;
        writer.write_all(b"checked out\n")?;
        writer.start_file("build/2_test.txt", options)?;
        writer.write_all(b"ok\n")?;
        writer.finish()?;
    }
    let redirect_url = format!("{}/storage/logs.zip", server.base_url());
    server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/actions/runs/5/logs");
            then.status(302).header("location", redirect_url.as_str());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/storage/logs.zip");
            then.status(200).body(zip_bytes.clone());
        })
        .await;

    let files = client(&server).download_workflow_run_logs("o", "r", 5).await?;
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["build/1_checkout.txt", "build/2_test.txt"]);
    assert_eq!(files[1].content, "ok\n");
    Ok(())
}

#[tokio::test]
async fn workflow_id_accepts_numbers_through_dispatch() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/repos/o/r/actions/workflows/161335");
            then.status(200).json_body(json!({ "id": 161335, "name": "CI" }));
        })
        .await;

    let params: Map<String, Value> = json!({ "owner": "o", "repo": "r", "workflow_id": 161335 })
        .as_object()
        .cloned()
        .unwrap_or_default();
    let resp = Server::with_client(client(&server))
        .handle_request(Request::new("github_get_workflow", params))
        .await;
    assert!(resp.is_success());
    assert_eq!(resp.data().unwrap()["name"], "CI");
    m.assert_async().await;
}
