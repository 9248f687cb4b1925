use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult};
use crate::http::{encode_path_segment, repo_path, Query};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const REPOSITORY_MEDIA_TYPE: &str = "application/vnd.github.v3.repository+json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCollaboratorsParams {
    pub owner: String,
    pub repo: String,
    /// `outside`, `direct` or `all`.
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(flatten)]
    pub page: Page,
}

fn collaborator_path(owner: &str, repo: &str, username: &str) -> String {
    format!(
        "{}/collaborators/{}",
        repo_path(owner, repo),
        encode_path_segment(username)
    )
}

fn team_repo_path(owner: &str, repo: &str, team_slug: &str) -> String {
    format!(
        "/orgs/{}/teams/{}{}",
        encode_path_segment(owner),
        encode_path_segment(team_slug),
        repo_path(owner, repo)
    )
}

impl GitHubClient {
    // Collaborators

    pub async fn list_collaborators(&self, params: &ListCollaboratorsParams) -> ApiResult<Value> {
        info!("Listing collaborators for {}/{}", params.owner, params.repo);
        let path = format!("{}/collaborators", repo_path(&params.owner, &params.repo));
        let query = Query::new()
            .opt("affiliation", params.affiliation.as_deref())
            .opt("permission", params.permission.as_deref())
            .opt("per_page", params.page.per_page)
            .opt("page", params.page.page);
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    /// `true` on 204, `false` on 404. Any other failure is an error.
    pub async fn check_collaborator(&self, owner: &str, repo: &str, username: &str) -> ApiResult<bool> {
        info!("Checking if {} collaborates on {}/{}", username, owner, repo);
        match self
            .rest
            .get(&collaborator_path(owner, repo, username), &Query::new())
            .await
        {
            Ok(_) => Ok(true),
            Err(f) if f.is_not_found() => {
                debug!("{} is not a collaborator on {}/{}", username, owner, repo);
                Ok(false)
            }
            Err(f) => Err(normalize(f)),
        }
    }

    /// Returns the invitation, or `null` when the user already had access.
    pub async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
        permission: Option<&str>,
    ) -> ApiResult<Value> {
        info!("Adding collaborator {} to {}/{}", username, owner, repo);
        let path = collaborator_path(owner, repo, username);
        let result = match permission {
            Some(p) => self.rest.put(&path, &json!({ "permission": p })).await,
            None => self.rest.put_empty(&path).await,
        };
        result.map_err(normalize)
    }

    pub async fn remove_collaborator(&self, owner: &str, repo: &str, username: &str) -> ApiResult<()> {
        info!("Removing collaborator {} from {}/{}", username, owner, repo);
        self.rest
            .delete(&collaborator_path(owner, repo, username))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    pub async fn get_collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
    ) -> ApiResult<String> {
        info!("Fetching permission of {} on {}/{}", username, owner, repo);
        let path = format!("{}/permission", collaborator_path(owner, repo, username));
        let raw = self.rest.get(&path, &Query::new()).await.map_err(normalize)?;
        Ok(raw
            .get("permission")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    // Invitations

    pub async fn list_repository_invitations(
        &self,
        owner: &str,
        repo: &str,
        page: Page,
    ) -> ApiResult<Value> {
        info!("Listing invitations for {}/{}", owner, repo);
        let path = format!("{}/invitations", repo_path(owner, repo));
        self.rest
            .get(&path, &page.query_or(30, 1))
            .await
            .map_err(normalize)
    }

    pub async fn delete_repository_invitation(
        &self,
        owner: &str,
        repo: &str,
        invitation_id: u64,
    ) -> ApiResult<()> {
        info!("Deleting invitation {} of {}/{}", invitation_id, owner, repo);
        let path = format!("{}/invitations/{}", repo_path(owner, repo), invitation_id);
        self.rest.delete(&path).await.map_err(normalize)?;
        Ok(())
    }

    // Teams

    pub async fn list_repository_teams(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing teams with access to {}/{}", owner, repo);
        let path = format!("{}/teams", repo_path(owner, repo));
        self.rest
            .get(&path, &page.query_or(30, 1))
            .await
            .map_err(normalize)
    }

    /// The team's view of the repository, or `None` when the team has no access.
    /// `owner` must be the organization that owns both.
    pub async fn check_team_permission(
        &self,
        owner: &str,
        repo: &str,
        team_slug: &str,
    ) -> ApiResult<Option<Value>> {
        info!("Checking team {} access to {}/{}", team_slug, owner, repo);
        match self
            .rest
            .get_with_accept(
                &team_repo_path(owner, repo, team_slug),
                &Query::new(),
                REPOSITORY_MEDIA_TYPE,
            )
            .await
        {
            Ok(v) => Ok(Some(v)),
            Err(f) if f.is_not_found() => Ok(None),
            Err(f) => Err(normalize(f)),
        }
    }

    pub async fn add_repository_team(
        &self,
        owner: &str,
        repo: &str,
        team_slug: &str,
        permission: Option<&str>,
    ) -> ApiResult<()> {
        info!("Granting team {} access to {}/{}", team_slug, owner, repo);
        let path = team_repo_path(owner, repo, team_slug);
        let result = match permission {
            Some(p) => self.rest.put(&path, &json!({ "permission": p })).await,
            None => self.rest.put_empty(&path).await,
        };
        result.map_err(normalize)?;
        Ok(())
    }

    pub async fn remove_repository_team(&self, owner: &str, repo: &str, team_slug: &str) -> ApiResult<()> {
        info!("Revoking team {} access to {}/{}", team_slug, owner, repo);
        self.rest
            .delete(&team_repo_path(owner, repo, team_slug))
            .await
            .map_err(normalize)?;
        Ok(())
    }
}
