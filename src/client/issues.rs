use super::{GitHubClient, Page, StateFilter};
use crate::error::{normalize, ApiResult};
use crate::http::{encode_path_segment, repo_path, Query};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIssueParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListIssuesParams {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub state: Option<StateFilter>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIssueParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub issue_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLabelParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `name` addresses the label; `new_name` renames it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLabelParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for milestone create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

fn issue_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/issues/{}", repo_path(owner, repo), number)
}

fn label_path(owner: &str, repo: &str, name: &str) -> String {
    format!("{}/labels/{}", repo_path(owner, repo), encode_path_segment(name))
}

fn milestone_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/milestones/{}", repo_path(owner, repo), number)
}

impl GitHubClient {
    // Issues

    pub async fn create_issue(&self, params: &CreateIssueParams) -> ApiResult<Value> {
        info!("Creating issue in {}/{}: {}", params.owner, params.repo, params.title);
        let path = format!("{}/issues", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn list_issues(&self, params: &ListIssuesParams) -> ApiResult<Value> {
        info!("Listing issues for {}/{}", params.owner, params.repo);
        let path = format!("{}/issues", repo_path(&params.owner, &params.repo));
        let labels = params
            .labels
            .as_ref()
            .filter(|l| !l.is_empty())
            .map(|l| l.join(","));
        let query = Query::new()
            .set("state", params.state.unwrap_or_default())
            .opt("labels", labels)
            .opt("sort", params.sort.as_deref())
            .opt("direction", params.direction.as_deref())
            .set("per_page", params.page.per_page.unwrap_or(30))
            .set("page", params.page.page.unwrap_or(1));
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    pub async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> ApiResult<Value> {
        info!("Fetching issue {}/{}#{}", owner, repo, number);
        self.rest
            .get(&issue_path(owner, repo, number), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn update_issue(&self, params: &UpdateIssueParams) -> ApiResult<Value> {
        info!(
            "Updating issue {}/{}#{}",
            params.owner, params.repo, params.issue_number
        );
        let path = issue_path(&params.owner, &params.repo, params.issue_number);
        self.rest.patch(&path, params).await.map_err(normalize)
    }

    pub async fn close_issue(&self, owner: &str, repo: &str, number: u64) -> ApiResult<Value> {
        info!("Closing issue {}/{}#{}", owner, repo, number);
        self.rest
            .patch(&issue_path(owner, repo, number), &json!({ "state": "closed" }))
            .await
            .map_err(normalize)
    }

    // Issue comments

    pub async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> ApiResult<Value> {
        info!("Listing comments on {}/{}#{}", owner, repo, number);
        let path = format!("{}/comments", issue_path(owner, repo, number));
        self.rest
            .get(&path, &page.query_or(30, 1))
            .await
            .map_err(normalize)
    }

    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> ApiResult<Value> {
        info!("Commenting on {}/{}#{}", owner, repo, number);
        let path = format!("{}/comments", issue_path(owner, repo, number));
        self.rest
            .post(&path, &json!({ "body": body }))
            .await
            .map_err(normalize)
    }

    pub async fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> ApiResult<Value> {
        info!("Updating comment {} in {}/{}", comment_id, owner, repo);
        let path = format!("{}/issues/comments/{}", repo_path(owner, repo), comment_id);
        self.rest
            .patch(&path, &json!({ "body": body }))
            .await
            .map_err(normalize)
    }

    pub async fn delete_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> ApiResult<()> {
        info!("Deleting comment {} in {}/{}", comment_id, owner, repo);
        let path = format!("{}/issues/comments/{}", repo_path(owner, repo), comment_id);
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    // Labels

    pub async fn list_labels(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing labels for {}/{}", owner, repo);
        let path = format!("{}/labels", repo_path(owner, repo));
        self.rest
            .get(&path, &page.query_or(100, 1))
            .await
            .map_err(normalize)
    }

    pub async fn get_label(&self, owner: &str, repo: &str, name: &str) -> ApiResult<Value> {
        info!("Fetching label '{}' in {}/{}", name, owner, repo);
        self.rest
            .get(&label_path(owner, repo, name), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn create_label(&self, params: &CreateLabelParams) -> ApiResult<Value> {
        info!(
            "Creating label '{}' in {}/{}",
            params.name, params.owner, params.repo
        );
        let path = format!("{}/labels", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn update_label(&self, params: &UpdateLabelParams) -> ApiResult<Value> {
        info!(
            "Updating label '{}' in {}/{}",
            params.name, params.owner, params.repo
        );
        let path = label_path(&params.owner, &params.repo, &params.name);
        self.rest.patch(&path, params).await.map_err(normalize)
    }

    pub async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> ApiResult<()> {
        info!("Deleting label '{}' in {}/{}", name, owner, repo);
        self.rest
            .delete(&label_path(owner, repo, name))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    // Milestones

    pub async fn list_milestones(
        &self,
        owner: &str,
        repo: &str,
        state: Option<StateFilter>,
        page: Page,
    ) -> ApiResult<Value> {
        info!("Listing milestones for {}/{}", owner, repo);
        let path = format!("{}/milestones", repo_path(owner, repo));
        let query = Query::new()
            .set("state", state.unwrap_or_default())
            .set("per_page", page.per_page.unwrap_or(30))
            .set("page", page.page.unwrap_or(1));
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    pub async fn get_milestone(&self, owner: &str, repo: &str, number: u64) -> ApiResult<Value> {
        info!("Fetching milestone {} in {}/{}", number, owner, repo);
        self.rest
            .get(&milestone_path(owner, repo, number), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn create_milestone(&self, params: &MilestoneParams) -> ApiResult<Value> {
        info!("Creating milestone in {}/{}", params.owner, params.repo);
        let path = format!("{}/milestones", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn update_milestone(&self, number: u64, params: &MilestoneParams) -> ApiResult<Value> {
        info!(
            "Updating milestone {} in {}/{}",
            number, params.owner, params.repo
        );
        self.rest
            .patch(&milestone_path(&params.owner, &params.repo, number), params)
            .await
            .map_err(normalize)
    }

    pub async fn delete_milestone(&self, owner: &str, repo: &str, number: u64) -> ApiResult<()> {
        info!("Deleting milestone {} in {}/{}", number, owner, repo);
        self.rest
            .delete(&milestone_path(owner, repo, number))
            .await
            .map_err(normalize)?;
        Ok(())
    }
}
