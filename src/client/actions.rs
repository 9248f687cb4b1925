use super::{GitHubClient, Page, WorkflowId};
use crate::error::{normalize, ApiResult, Failure};
use crate::http::{encode_path_segment, repo_path, Query};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Cursor, Read};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorkflowRunsParams {
    pub owner: String,
    pub repo: String,
    /// Runs of one workflow; all runs of the repository when absent.
    #[serde(default)]
    pub workflow_id: Option<WorkflowId>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub exclude_pull_requests: Option<bool>,
    #[serde(default)]
    pub check_suite_id: Option<u64>,
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorkflowJobsParams {
    pub owner: String,
    pub repo: String,
    pub run_id: u64,
    /// `latest` or `all`.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListArtifactsParams {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub run_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDispatchParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub workflow_id: WorkflowId,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Map<String, Value>>,
}

/// One file out of a workflow run's log archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    pub name: String,
    pub content: String,
}

/// A downloaded artifact zip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDownload {
    pub artifact_id: u64,
    pub size: usize,
    pub entries: Vec<String>,
    pub content_base64: String,
}

fn actions_path(owner: &str, repo: &str) -> String {
    format!("{}/actions", repo_path(owner, repo))
}

fn workflow_path(owner: &str, repo: &str, workflow_id: &WorkflowId) -> String {
    format!(
        "{}/workflows/{}",
        actions_path(owner, repo),
        encode_path_segment(&workflow_id.to_string())
    )
}

fn run_path(owner: &str, repo: &str, run_id: u64) -> String {
    format!("{}/runs/{}", actions_path(owner, repo), run_id)
}

fn artifact_path(owner: &str, repo: &str, artifact_id: u64) -> String {
    format!("{}/artifacts/{}", actions_path(owner, repo), artifact_id)
}

/// List endpoints wrap the items in `{ total_count, <key>: [...] }`.
fn take_list(mut raw: Value, key: &str) -> Value {
    match raw.get_mut(key) {
        Some(items) => items.take(),
        None => Value::Array(Vec::new()),
    }
}

/// Expand a log archive into its text files, in archive order.
pub fn expand_log_archive(bytes: &[u8]) -> Result<Vec<LogFile>, Failure> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        files.push(LogFile {
            name: entry.name().to_string(),
            content: String::from_utf8_lossy(&buf).into_owned(),
        });
    }
    Ok(files)
}

fn archive_entries(bytes: &[u8]) -> Result<Vec<String>, Failure> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

impl GitHubClient {
    // Workflows

    pub async fn list_workflows(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing workflows for {}/{}", owner, repo);
        let path = format!("{}/workflows", actions_path(owner, repo));
        let raw = self.rest.get(&path, &page.query()).await.map_err(normalize)?;
        Ok(take_list(raw, "workflows"))
    }

    pub async fn get_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &WorkflowId,
    ) -> ApiResult<Value> {
        info!("Fetching workflow {} of {}/{}", workflow_id, owner, repo);
        self.rest
            .get(&workflow_path(owner, repo, workflow_id), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn create_workflow_dispatch(&self, params: &WorkflowDispatchParams) -> ApiResult<()> {
        info!(
            "Dispatching workflow {} on {} in {}/{}",
            params.workflow_id, params.git_ref, params.owner, params.repo
        );
        let path = format!(
            "{}/dispatches",
            workflow_path(&params.owner, &params.repo, &params.workflow_id)
        );
        self.rest.post(&path, params).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn get_workflow_usage(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &WorkflowId,
    ) -> ApiResult<Value> {
        info!("Fetching usage of workflow {} in {}/{}", workflow_id, owner, repo);
        let path = format!("{}/timing", workflow_path(owner, repo, workflow_id));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    // Runs

    pub async fn list_workflow_runs(&self, params: &ListWorkflowRunsParams) -> ApiResult<Value> {
        let (owner, repo) = (params.owner.as_str(), params.repo.as_str());
        let path = match &params.workflow_id {
            Some(id) => {
                info!("Listing runs of workflow {} in {}/{}", id, owner, repo);
                format!("{}/runs", workflow_path(owner, repo, id))
            }
            None => {
                info!("Listing workflow runs for {}/{}", owner, repo);
                format!("{}/runs", actions_path(owner, repo))
            }
        };
        let query = Query::new()
            .opt("actor", params.actor.as_deref())
            .opt("branch", params.branch.as_deref())
            .opt("event", params.event.as_deref())
            .opt("status", params.status.as_deref())
            .opt("created", params.created.as_deref())
            .opt("exclude_pull_requests", params.exclude_pull_requests)
            .opt("check_suite_id", params.check_suite_id)
            .opt("head_sha", params.head_sha.as_deref())
            .opt("per_page", params.page.per_page)
            .opt("page", params.page.page);
        let raw = self.rest.get(&path, &query).await.map_err(normalize)?;
        Ok(take_list(raw, "workflow_runs"))
    }

    pub async fn get_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<Value> {
        info!("Fetching workflow run {} of {}/{}", run_id, owner, repo);
        self.rest
            .get(&run_path(owner, repo, run_id), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn rerun_workflow(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<()> {
        info!("Re-running workflow run {} of {}/{}", run_id, owner, repo);
        let path = format!("{}/rerun", run_path(owner, repo, run_id));
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn rerun_failed_jobs(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<()> {
        info!("Re-running failed jobs of run {} in {}/{}", run_id, owner, repo);
        let path = format!("{}/rerun-failed-jobs", run_path(owner, repo, run_id));
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn cancel_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<()> {
        info!("Cancelling workflow run {} of {}/{}", run_id, owner, repo);
        let path = format!("{}/cancel", run_path(owner, repo, run_id));
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn delete_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<()> {
        info!("Deleting workflow run {} of {}/{}", run_id, owner, repo);
        self.rest
            .delete(&run_path(owner, repo, run_id))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    pub async fn get_workflow_run_usage(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> ApiResult<Value> {
        info!("Fetching usage of run {} in {}/{}", run_id, owner, repo);
        let path = format!("{}/timing", run_path(owner, repo, run_id));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    // Jobs and logs

    pub async fn list_workflow_jobs(&self, params: &ListWorkflowJobsParams) -> ApiResult<Value> {
        info!(
            "Listing jobs of run {} in {}/{}",
            params.run_id, params.owner, params.repo
        );
        let path = format!(
            "{}/jobs",
            run_path(&params.owner, &params.repo, params.run_id)
        );
        let query = Query::new()
            .opt("filter", params.filter.as_deref())
            .opt("per_page", params.page.per_page)
            .opt("page", params.page.page);
        let raw = self.rest.get(&path, &query).await.map_err(normalize)?;
        Ok(take_list(raw, "jobs"))
    }

    pub async fn get_workflow_job(&self, owner: &str, repo: &str, job_id: u64) -> ApiResult<Value> {
        info!("Fetching job {} of {}/{}", job_id, owner, repo);
        let path = format!("{}/jobs/{}", actions_path(owner, repo), job_id);
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn download_job_logs(&self, owner: &str, repo: &str, job_id: u64) -> ApiResult<String> {
        info!("Downloading logs of job {} in {}/{}", job_id, owner, repo);
        let path = format!("{}/jobs/{}/logs", actions_path(owner, repo), job_id);
        self.rest.get_text(&path).await.map_err(normalize)
    }

    pub async fn download_workflow_run_logs(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> ApiResult<Vec<LogFile>> {
        info!("Downloading logs of run {} in {}/{}", run_id, owner, repo);
        let path = format!("{}/logs", run_path(owner, repo, run_id));
        let bytes = self
            .rest
            .get_bytes(&path, &Query::new())
            .await
            .map_err(normalize)?;
        debug!("Run {} log archive is {} bytes", run_id, bytes.len());
        expand_log_archive(&bytes).map_err(normalize)
    }

    pub async fn delete_workflow_run_logs(&self, owner: &str, repo: &str, run_id: u64) -> ApiResult<()> {
        info!("Deleting logs of run {} in {}/{}", run_id, owner, repo);
        let path = format!("{}/logs", run_path(owner, repo, run_id));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    // Artifacts

    pub async fn list_artifacts(&self, params: &ListArtifactsParams) -> ApiResult<Value> {
        let (owner, repo) = (params.owner.as_str(), params.repo.as_str());
        let path = match params.run_id {
            Some(run_id) => {
                info!("Listing artifacts of run {} in {}/{}", run_id, owner, repo);
                format!("{}/artifacts", run_path(owner, repo, run_id))
            }
            None => {
                info!("Listing artifacts for {}/{}", owner, repo);
                format!("{}/artifacts", actions_path(owner, repo))
            }
        };
        let query = Query::new()
            .opt("name", params.name.as_deref())
            .opt("per_page", params.page.per_page)
            .opt("page", params.page.page);
        let raw = self.rest.get(&path, &query).await.map_err(normalize)?;
        Ok(take_list(raw, "artifacts"))
    }

    pub async fn get_artifact(&self, owner: &str, repo: &str, artifact_id: u64) -> ApiResult<Value> {
        info!("Fetching artifact {} of {}/{}", artifact_id, owner, repo);
        self.rest
            .get(&artifact_path(owner, repo, artifact_id), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn download_artifact(
        &self,
        owner: &str,
        repo: &str,
        artifact_id: u64,
    ) -> ApiResult<ArtifactDownload> {
        info!("Downloading artifact {} of {}/{}", artifact_id, owner, repo);
        let path = format!("{}/zip", artifact_path(owner, repo, artifact_id));
        let bytes = self
            .rest
            .get_bytes(&path, &Query::new())
            .await
            .map_err(normalize)?;
        let entries = archive_entries(&bytes).map_err(normalize)?;
        Ok(ArtifactDownload {
            artifact_id,
            size: bytes.len(),
            entries,
            content_base64: STANDARD.encode(&bytes),
        })
    }

    pub async fn delete_artifact(&self, owner: &str, repo: &str, artifact_id: u64) -> ApiResult<()> {
        info!("Deleting artifact {} of {}/{}", artifact_id, owner, repo);
        self.rest
            .delete(&artifact_path(owner, repo, artifact_id))
            .await
            .map_err(normalize)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn log_archive_expands_in_order() {
        let bytes = zip_of(&[("1_build.txt", "compiling"), ("2_test.txt", "ok")]);
        let files = expand_log_archive(&bytes).unwrap();
        assert_eq!(
            files,
            vec![
                LogFile { name: "1_build.txt".into(), content: "compiling".into() },
                LogFile { name: "2_test.txt".into(), content: "ok".into() },
            ]
        );
    }

    #[test]
    fn corrupt_archive_is_a_failure() {
        assert!(expand_log_archive(b"not a zip").is_err());
    }

    #[test]
    fn list_wrapper_is_unwrapped() {
        let raw = json!({ "total_count": 1, "jobs": [{ "id": 7 }] });
        assert_eq!(take_list(raw, "jobs"), json!([{ "id": 7 }]));
        assert_eq!(take_list(json!({}), "jobs"), json!([]));
    }

    #[test]
    fn dispatch_body_carries_ref_and_inputs_only() {
        let params: WorkflowDispatchParams = serde_json::from_value(json!({
            "owner": "o", "repo": "r", "workflow_id": "ci.yml",
            "ref": "main", "inputs": { "debug": "true" }
        }))
        .unwrap();
        assert_eq!(params.workflow_id, WorkflowId::FileName("ci.yml".into()));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "ref": "main", "inputs": { "debug": "true" } })
        );
    }
}
