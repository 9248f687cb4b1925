use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult, Failure};
use crate::http::{encode_path_segment, repo_path, Query};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRepositoryParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
}

/// Repository settings; only fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRepositoryParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_downloads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_update_branch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_squash_pr_title_as_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squash_merge_commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_forking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_commit_signoff_required: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub new_owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<u64>>,
}

/// One week of the code frequency report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFrequency {
    pub week: i64,
    pub additions: i64,
    pub deletions: i64,
}

impl GitHubClient {
    pub async fn get_repository(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Fetching repository: {}/{}", owner, repo);
        self.rest
            .get(&repo_path(owner, repo), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn list_repositories(&self, username: &str) -> ApiResult<Value> {
        info!("Listing repositories for user: {}", username);
        let path = format!("/users/{}/repos", encode_path_segment(username));
        self.rest
            .get(&path, &Page::default().query_or(100, 1))
            .await
            .map_err(normalize)
    }

    pub async fn create_repository(&self, params: &CreateRepositoryParams) -> ApiResult<Value> {
        info!("Creating repository: {}", params.name);
        self.rest.post("/user/repos", params).await.map_err(normalize)
    }

    pub async fn delete_repository(&self, owner: &str, repo: &str) -> ApiResult<()> {
        info!("Deleting repository: {}/{}", owner, repo);
        self.rest.delete(&repo_path(owner, repo)).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn update_repository(&self, params: &UpdateRepositoryParams) -> ApiResult<Value> {
        info!("Updating repository {}/{}", params.owner, params.repo);
        self.rest
            .patch(&repo_path(&params.owner, &params.repo), params)
            .await
            .map_err(normalize)
    }

    pub async fn get_repository_topics(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Getting topics for {}/{}", owner, repo);
        let path = format!("{}/topics", repo_path(owner, repo));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn replace_repository_topics(
        &self,
        owner: &str,
        repo: &str,
        topics: &[String],
    ) -> ApiResult<Value> {
        info!("Replacing topics for {}/{}", owner, repo);
        let path = format!("{}/topics", repo_path(owner, repo));
        self.rest
            .put(&path, &json!({ "names": topics }))
            .await
            .map_err(normalize)
    }

    pub async fn get_repository_languages(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Getting languages for {}/{}", owner, repo);
        let path = format!("{}/languages", repo_path(owner, repo));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    /// Weekly additions/deletions. GitHub answers 202 with no body while the
    /// statistics are still being computed; that comes back as an empty list.
    pub async fn get_code_frequency_stats(
        &self,
        owner: &str,
        repo: &str,
    ) -> ApiResult<Vec<CodeFrequency>> {
        info!("Getting code frequency stats for {}/{}", owner, repo);
        let path = format!("{}/stats/code_frequency", repo_path(owner, repo));
        let (status, raw) = self
            .rest
            .get_with_status(&path, &Query::new())
            .await
            .map_err(normalize)?;
        if status == 202 || !raw.is_array() {
            debug!("Code frequency for {}/{} not ready (status {})", owner, repo, status);
            return Ok(Vec::new());
        }
        let weeks: Vec<(i64, i64, i64)> =
            serde_json::from_value(raw).map_err(|e| normalize(Failure::from(e)))?;
        Ok(weeks
            .into_iter()
            .map(|(week, additions, deletions)| CodeFrequency {
                week,
                additions,
                deletions,
            })
            .collect())
    }

    pub async fn get_contributors_stats(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Getting contributor stats for {}/{}", owner, repo);
        let path = format!("{}/stats/contributors", repo_path(owner, repo));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn get_participation_stats(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Getting participation stats for {}/{}", owner, repo);
        let path = format!("{}/stats/participation", repo_path(owner, repo));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn transfer_repository(&self, params: &TransferParams) -> ApiResult<Value> {
        info!(
            "Transferring {}/{} to {}",
            params.owner, params.repo, params.new_owner
        );
        let path = format!("{}/transfer", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn enable_automated_security_fixes(&self, owner: &str, repo: &str) -> ApiResult<()> {
        info!("Enabling automated security fixes for {}/{}", owner, repo);
        let path = format!("{}/automated-security-fixes", repo_path(owner, repo));
        self.rest.put_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn disable_automated_security_fixes(&self, owner: &str, repo: &str) -> ApiResult<()> {
        info!("Disabling automated security fixes for {}/{}", owner, repo);
        let path = format!("{}/automated-security-fixes", repo_path(owner, repo));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn enable_vulnerability_alerts(&self, owner: &str, repo: &str) -> ApiResult<()> {
        info!("Enabling vulnerability alerts for {}/{}", owner, repo);
        let path = format!("{}/vulnerability-alerts", repo_path(owner, repo));
        self.rest.put_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn disable_vulnerability_alerts(&self, owner: &str, repo: &str) -> ApiResult<()> {
        info!("Disabling vulnerability alerts for {}/{}", owner, repo);
        let path = format!("{}/vulnerability-alerts", repo_path(owner, repo));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn get_authenticated_user(&self) -> ApiResult<Value> {
        info!("Fetching authenticated user");
        self.rest.get("/user", &Query::new()).await.map_err(normalize)
    }
}
