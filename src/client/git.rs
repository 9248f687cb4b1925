use super::contents::CommitIdentity;
use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult, Failure};
use crate::http::{encode_path, encode_path_segment, repo_path, Query};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBranchParams {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Start point. Falls back to `from_branch`, then to the default branch.
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub from_branch: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeBranchParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub base: String,
    pub head: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// GitHub expects all four protection keys, `null` meaning "disabled".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProtectionParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub branch: String,
    #[serde(default)]
    pub required_status_checks: Option<Value>,
    pub enforce_admins: bool,
    #[serde(default)]
    pub required_pull_request_reviews: Option<Value>,
    #[serde(default)]
    pub restrictions: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCommitsParams {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub committer: Option<String>,
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub until: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReferenceParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(rename = "ref", skip_serializing)]
    pub git_ref: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

/// Annotated tag object. `object_type` is `commit`, `tree` or `blob`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTagParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub tag: String,
    pub message: String,
    pub object: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagger: Option<CommitIdentity>,
}

#[derive(Deserialize)]
struct RepositoryInfo {
    default_branch: String,
}

#[derive(Deserialize)]
struct BranchInfo {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

fn branch_path(owner: &str, repo: &str, branch: &str) -> String {
    format!("{}/branches/{}", repo_path(owner, repo), encode_path_segment(branch))
}

impl GitHubClient {
    // Branches

    pub async fn list_branches(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing branches for {}/{}", owner, repo);
        let path = format!("{}/branches", repo_path(owner, repo));
        self.rest
            .get(&path, &page.query_or(100, 1))
            .await
            .map_err(normalize)
    }

    pub async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> ApiResult<Value> {
        info!("Fetching branch {} of {}/{}", branch, owner, repo);
        self.rest
            .get(&branch_path(owner, repo, branch), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn create_branch(&self, params: &CreateBranchParams) -> ApiResult<Value> {
        let (owner, repo) = (params.owner.as_str(), params.repo.as_str());
        info!("Creating branch {} in {}/{}", params.branch, owner, repo);
        let sha = match (&params.sha, &params.from_branch) {
            (Some(sha), _) => sha.clone(),
            (None, Some(from)) => self.branch_tip(owner, repo, from).await.map_err(normalize)?,
            (None, None) => {
                let raw = self
                    .rest
                    .get(&repo_path(owner, repo), &Query::new())
                    .await
                    .map_err(normalize)?;
                let info: RepositoryInfo =
                    serde_json::from_value(raw).map_err(|e| normalize(e.into()))?;
                self.branch_tip(owner, repo, &info.default_branch)
                    .await
                    .map_err(normalize)?
            }
        };
        debug!("Branch {} will start at {}", params.branch, sha);
        let body = json!({ "ref": format!("refs/heads/{}", params.branch), "sha": sha });
        let path = format!("{}/git/refs", repo_path(owner, repo));
        self.rest.post(&path, &body).await.map_err(normalize)
    }

    async fn branch_tip(&self, owner: &str, repo: &str, branch: &str) -> Result<String, Failure> {
        let raw = self
            .rest
            .get(&branch_path(owner, repo, branch), &Query::new())
            .await?;
        let info: BranchInfo = serde_json::from_value(raw)?;
        Ok(info.commit.sha)
    }

    pub async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> ApiResult<()> {
        info!("Deleting branch {} of {}/{}", branch, owner, repo);
        let path = format!("{}/git/refs/heads/{}", repo_path(owner, repo), encode_path(branch));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn merge_branch(&self, params: &MergeBranchParams) -> ApiResult<Value> {
        info!(
            "Merging {} into {} in {}/{}",
            params.head, params.base, params.owner, params.repo
        );
        let path = format!("{}/merges", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> ApiResult<Value> {
        info!("Fetching protection for {} in {}/{}", branch, owner, repo);
        let path = format!("{}/protection", branch_path(owner, repo, branch));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn update_branch_protection(
        &self,
        params: &BranchProtectionParams,
    ) -> ApiResult<Value> {
        info!(
            "Updating protection for {} in {}/{}",
            params.branch, params.owner, params.repo
        );
        let path = format!(
            "{}/protection",
            branch_path(&params.owner, &params.repo, &params.branch)
        );
        self.rest.put(&path, params).await.map_err(normalize)
    }

    pub async fn delete_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> ApiResult<()> {
        info!("Removing protection for {} in {}/{}", branch, owner, repo);
        let path = format!("{}/protection", branch_path(owner, repo, branch));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    // Commits

    pub async fn list_commits(&self, params: &ListCommitsParams) -> ApiResult<Value> {
        info!("Listing commits for {}/{}", params.owner, params.repo);
        let path = format!("{}/commits", repo_path(&params.owner, &params.repo));
        let query = Query::new()
            .opt("sha", params.sha.as_deref())
            .opt("path", params.path.as_deref())
            .opt("author", params.author.as_deref())
            .opt("committer", params.committer.as_deref())
            .opt("since", params.since.as_deref())
            .opt("until", params.until.as_deref())
            .opt("per_page", params.page.per_page)
            .opt("page", params.page.page);
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    pub async fn get_commit(&self, owner: &str, repo: &str, git_ref: &str) -> ApiResult<Value> {
        info!("Fetching commit {} of {}/{}", git_ref, owner, repo);
        let path = format!("{}/commits/{}", repo_path(owner, repo), encode_path(git_ref));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> ApiResult<Value> {
        info!("Comparing {}...{} in {}/{}", base, head, owner, repo);
        let path = format!(
            "{}/compare/{}...{}",
            repo_path(owner, repo),
            encode_path(base),
            encode_path(head)
        );
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    // References

    /// `namespace` is a ref prefix such as `heads/` or `tags/v1`; `heads/` when absent.
    pub async fn list_references(
        &self,
        owner: &str,
        repo: &str,
        namespace: Option<&str>,
        page: Page,
    ) -> ApiResult<Value> {
        let namespace = namespace.unwrap_or("heads/");
        info!("Listing refs under {} in {}/{}", namespace, owner, repo);
        let path = format!(
            "{}/git/matching-refs/{}",
            repo_path(owner, repo),
            encode_path(namespace)
        );
        self.rest
            .get(&path, &page.query_or(100, 1))
            .await
            .map_err(normalize)
    }

    pub async fn get_reference(&self, owner: &str, repo: &str, git_ref: &str) -> ApiResult<Value> {
        info!("Fetching ref {} of {}/{}", git_ref, owner, repo);
        let path = format!("{}/git/ref/{}", repo_path(owner, repo), encode_path(git_ref));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    /// `git_ref` is fully qualified (`refs/heads/main`).
    pub async fn create_reference(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        sha: &str,
    ) -> ApiResult<Value> {
        info!("Creating ref {} in {}/{}", git_ref, owner, repo);
        let path = format!("{}/git/refs", repo_path(owner, repo));
        self.rest
            .post(&path, &json!({ "ref": git_ref, "sha": sha }))
            .await
            .map_err(normalize)
    }

    pub async fn update_reference(&self, params: &UpdateReferenceParams) -> ApiResult<Value> {
        info!(
            "Updating ref {} in {}/{}",
            params.git_ref, params.owner, params.repo
        );
        let path = format!(
            "{}/git/refs/{}",
            repo_path(&params.owner, &params.repo),
            encode_path(&params.git_ref)
        );
        self.rest.patch(&path, params).await.map_err(normalize)
    }

    pub async fn delete_reference(&self, owner: &str, repo: &str, git_ref: &str) -> ApiResult<()> {
        info!("Deleting ref {} of {}/{}", git_ref, owner, repo);
        let path = format!("{}/git/refs/{}", repo_path(owner, repo), encode_path(git_ref));
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    // Tags

    pub async fn create_tag(&self, params: &CreateTagParams) -> ApiResult<Value> {
        info!(
            "Creating tag {} in {}/{}",
            params.tag, params.owner, params.repo
        );
        let path = format!("{}/git/tags", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn get_tag(&self, owner: &str, repo: &str, tag_sha: &str) -> ApiResult<Value> {
        info!("Fetching tag {} of {}/{}", tag_sha, owner, repo);
        let path = format!("{}/git/tags/{}", repo_path(owner, repo), encode_path_segment(tag_sha));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protection_body_sends_all_four_keys() {
        let params = BranchProtectionParams {
            owner: "o".into(),
            repo: "r".into(),
            branch: "main".into(),
            enforce_admins: true,
            ..Default::default()
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "required_status_checks": null,
                "enforce_admins": true,
                "required_pull_request_reviews": null,
                "restrictions": null,
            })
        );
    }

    #[test]
    fn tag_type_is_renamed_on_the_wire() {
        let params: CreateTagParams = serde_json::from_value(json!({
            "owner": "o", "repo": "r", "tag": "v1", "message": "m",
            "object": "abc", "type": "commit"
        }))
        .unwrap();
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["type"], "commit");
        assert!(body.get("owner").is_none());
    }
}
