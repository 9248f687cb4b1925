use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult};
use crate::http::{encode_path_segment, repo_path, Query};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OCTET_STREAM: &str = "application/octet-stream";

/// Release body shared by create and update; create requires `tag_name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_release_notes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make_latest: Option<String>,
}

/// `data` is sent as the raw request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadAssetParams {
    pub owner: String,
    pub repo: String,
    pub release_id: u64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub data: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateNotesParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_file_path: Option<String>,
}

fn release_path(owner: &str, repo: &str, id: u64) -> String {
    format!("{}/releases/{}", repo_path(owner, repo), id)
}

fn asset_path(owner: &str, repo: &str, asset_id: u64) -> String {
    format!("{}/releases/assets/{}", repo_path(owner, repo), asset_id)
}

impl GitHubClient {
    pub async fn list_releases(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing releases for {}/{}", owner, repo);
        let path = format!("{}/releases", repo_path(owner, repo));
        self.rest.get(&path, &page.query()).await.map_err(normalize)
    }

    pub async fn get_release(&self, owner: &str, repo: &str, release_id: u64) -> ApiResult<Value> {
        info!("Fetching release {} of {}/{}", release_id, owner, repo);
        self.rest
            .get(&release_path(owner, repo, release_id), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> ApiResult<Value> {
        info!("Fetching release for tag {} of {}/{}", tag, owner, repo);
        let path = format!("{}/releases/tags/{}", repo_path(owner, repo), encode_path_segment(tag));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn get_latest_release(&self, owner: &str, repo: &str) -> ApiResult<Value> {
        info!("Fetching latest release of {}/{}", owner, repo);
        let path = format!("{}/releases/latest", repo_path(owner, repo));
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn create_release(&self, params: &ReleaseParams) -> ApiResult<Value> {
        info!(
            "Creating release {} in {}/{}",
            params.tag_name.as_deref().unwrap_or(""),
            params.owner,
            params.repo
        );
        let path = format!("{}/releases", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn update_release(&self, release_id: u64, params: &ReleaseParams) -> ApiResult<Value> {
        info!(
            "Updating release {} in {}/{}",
            release_id, params.owner, params.repo
        );
        self.rest
            .patch(&release_path(&params.owner, &params.repo, release_id), params)
            .await
            .map_err(normalize)
    }

    pub async fn delete_release(&self, owner: &str, repo: &str, release_id: u64) -> ApiResult<()> {
        info!("Deleting release {} of {}/{}", release_id, owner, repo);
        self.rest
            .delete(&release_path(owner, repo, release_id))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    pub async fn list_release_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        page: Page,
    ) -> ApiResult<Value> {
        info!("Listing assets of release {} in {}/{}", release_id, owner, repo);
        let path = format!("{}/assets", release_path(owner, repo, release_id));
        self.rest
            .get(&path, &page.query_or(30, 1))
            .await
            .map_err(normalize)
    }

    pub async fn get_release_asset(&self, owner: &str, repo: &str, asset_id: u64) -> ApiResult<Value> {
        info!("Fetching release asset {} of {}/{}", asset_id, owner, repo);
        self.rest
            .get(&asset_path(owner, repo, asset_id), &Query::new())
            .await
            .map_err(normalize)
    }

    /// Upload goes to the upload host, not the API host.
    pub async fn upload_release_asset(&self, params: &UploadAssetParams) -> ApiResult<Value> {
        info!(
            "Uploading asset {} to release {} in {}/{}",
            params.name, params.release_id, params.owner, params.repo
        );
        let path = format!(
            "{}/assets",
            release_path(&params.owner, &params.repo, params.release_id)
        );
        let query = Query::new()
            .set("name", &params.name)
            .opt("label", params.label.as_deref());
        let content_type = params.content_type.as_deref().unwrap_or(OCTET_STREAM);
        self.rest
            .upload(&path, &query, content_type, params.data.as_bytes().to_vec())
            .await
            .map_err(normalize)
    }

    pub async fn update_release_asset(
        &self,
        owner: &str,
        repo: &str,
        asset_id: u64,
        name: Option<&str>,
        label: Option<&str>,
    ) -> ApiResult<Value> {
        info!("Updating release asset {} of {}/{}", asset_id, owner, repo);
        let mut body = Map::new();
        if let Some(name) = name {
            body.insert("name".into(), Value::from(name));
        }
        if let Some(label) = label {
            body.insert("label".into(), Value::from(label));
        }
        self.rest
            .patch(&asset_path(owner, repo, asset_id), &body)
            .await
            .map_err(normalize)
    }

    pub async fn delete_release_asset(&self, owner: &str, repo: &str, asset_id: u64) -> ApiResult<()> {
        info!("Deleting release asset {} of {}/{}", asset_id, owner, repo);
        self.rest
            .delete(&asset_path(owner, repo, asset_id))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    pub async fn generate_release_notes(&self, params: &GenerateNotesParams) -> ApiResult<Value> {
        info!(
            "Generating release notes for {} in {}/{}",
            params.tag_name, params.owner, params.repo
        );
        let path = format!(
            "{}/releases/generate-notes",
            repo_path(&params.owner, &params.repo)
        );
        self.rest.post(&path, params).await.map_err(normalize)
    }
}
