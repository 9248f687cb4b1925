use super::{GitHubClient, Page, StateFilter};
use crate::error::{normalize, ApiResult};
use crate::http::{repo_path, Query};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePullRequestParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub title: String,
    pub head: String,
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPullRequestsParams {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub state: Option<StateFilter>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

/// A review comment anchored on a diff position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewCommentParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub pull_number: u64,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

fn pull_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/pulls/{}", repo_path(owner, repo), number)
}

impl GitHubClient {
    pub async fn create_pull_request(&self, params: &CreatePullRequestParams) -> ApiResult<Value> {
        info!(
            "Creating pull request in {}/{}: {} -> {}",
            params.owner, params.repo, params.head, params.base
        );
        let path = format!("{}/pulls", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn list_pull_requests(&self, params: &ListPullRequestsParams) -> ApiResult<Value> {
        info!("Listing pull requests for {}/{}", params.owner, params.repo);
        let path = format!("{}/pulls", repo_path(&params.owner, &params.repo));
        let query = Query::new()
            .set("state", params.state.unwrap_or_default())
            .opt("head", params.head.as_deref())
            .opt("base", params.base.as_deref())
            .opt("sort", params.sort.as_deref())
            .opt("direction", params.direction.as_deref())
            .set("per_page", params.page.per_page.unwrap_or(30))
            .set("page", params.page.page.unwrap_or(1));
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    pub async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> ApiResult<Value> {
        info!("Fetching pull request {}/{}#{}", owner, repo, number);
        self.rest
            .get(&pull_path(owner, repo, number), &Query::new())
            .await
            .map_err(normalize)
    }

    /// Returns GitHub's merge result (`sha`, `merged`, `message`).
    pub async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        commit_message: Option<&str>,
    ) -> ApiResult<Value> {
        info!("Merging pull request {}/{}#{}", owner, repo, number);
        let path = format!("{}/merge", pull_path(owner, repo, number));
        let body = match commit_message {
            Some(m) => json!({ "commit_message": m }),
            None => json!({}),
        };
        self.rest.put(&path, &body).await.map_err(normalize)
    }

    pub async fn list_pull_request_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> ApiResult<Value> {
        info!("Listing review comments on {}/{}#{}", owner, repo, number);
        let path = format!("{}/comments", pull_path(owner, repo, number));
        self.rest
            .get(&path, &page.query_or(30, 1))
            .await
            .map_err(normalize)
    }

    pub async fn create_pull_request_comment(
        &self,
        params: &ReviewCommentParams,
    ) -> ApiResult<Value> {
        info!(
            "Commenting on pull request {}/{}#{}",
            params.owner, params.repo, params.pull_number
        );
        let path = format!(
            "{}/comments",
            pull_path(&params.owner, &params.repo, params.pull_number)
        );
        self.rest.post(&path, params).await.map_err(normalize)
    }
}
