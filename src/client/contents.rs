use super::GitHubClient;
use crate::error::{normalize, ApiResult};
use crate::http::{encode_path, repo_path, Query};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name and email recorded as committer or author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Create or update a file. `content` is plain text; it is base64 encoded on
/// the way out. `sha` is the blob being replaced and is required for updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteFileParams {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub message: String,
    pub content: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub committer: Option<CommitIdentity>,
    #[serde(default)]
    pub author: Option<CommitIdentity>,
}

#[derive(Serialize)]
struct WriteFileBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    committer: Option<&'a CommitIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a CommitIdentity>,
}

impl WriteFileParams {
    fn body(&self) -> WriteFileBody<'_> {
        WriteFileBody {
            message: &self.message,
            content: STANDARD.encode(self.content.as_bytes()),
            sha: self.sha.as_deref(),
            branch: self.branch.as_deref(),
            committer: self.committer.as_ref(),
            author: self.author.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteFileParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub path: String,
    pub message: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<CommitIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitIdentity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    Zipball,
    Tarball,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveFormat::Zipball => "zipball",
            ArchiveFormat::Tarball => "tarball",
        })
    }
}

/// A downloaded source archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Archive {
    pub format: ArchiveFormat,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub size: usize,
    pub content_base64: String,
}

fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    format!("{}/contents/{}", repo_path(owner, repo), encode_path(path))
}

impl GitHubClient {
    pub async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<Value> {
        info!("Fetching file {} from {}/{}", path, owner, repo);
        self.rest
            .get(&contents_path(owner, repo, path), &Query::new().opt("ref", git_ref))
            .await
            .map_err(normalize)
    }

    pub async fn get_directory_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<Value> {
        info!("Listing directory {} in {}/{}", path, owner, repo);
        self.rest
            .get(&contents_path(owner, repo, path), &Query::new().opt("ref", git_ref))
            .await
            .map_err(normalize)
    }

    pub async fn create_file(&self, params: &WriteFileParams) -> ApiResult<Value> {
        info!(
            "Creating file {} in {}/{}",
            params.path, params.owner, params.repo
        );
        let path = contents_path(&params.owner, &params.repo, &params.path);
        self.rest.put(&path, &params.body()).await.map_err(normalize)
    }

    pub async fn update_file(&self, params: &WriteFileParams) -> ApiResult<Value> {
        info!(
            "Updating file {} in {}/{}",
            params.path, params.owner, params.repo
        );
        let path = contents_path(&params.owner, &params.repo, &params.path);
        self.rest.put(&path, &params.body()).await.map_err(normalize)
    }

    pub async fn delete_file(&self, params: &DeleteFileParams) -> ApiResult<Value> {
        info!(
            "Deleting file {} in {}/{}",
            params.path, params.owner, params.repo
        );
        let path = contents_path(&params.owner, &params.repo, &params.path);
        self.rest
            .delete_with_body(&path, params)
            .await
            .map_err(normalize)
    }

    pub async fn get_repository_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> ApiResult<Value> {
        info!("Fetching tree {} of {}/{}", tree_sha, owner, repo);
        let path = format!("{}/git/trees/{}", repo_path(owner, repo), encode_path(tree_sha));
        let query = if recursive {
            Query::new().set("recursive", "true")
        } else {
            Query::new()
        };
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    /// Missing `git_ref` downloads `HEAD`.
    pub async fn download_repository_archive(
        &self,
        owner: &str,
        repo: &str,
        format: ArchiveFormat,
        git_ref: Option<&str>,
    ) -> ApiResult<Archive> {
        let git_ref = git_ref.unwrap_or("HEAD");
        info!(
            "Downloading {} of {}/{} at {}",
            format, owner, repo, git_ref
        );
        let path = format!("{}/{}/{}", repo_path(owner, repo), format, encode_path(git_ref));
        let bytes = self
            .rest
            .get_bytes(&path, &Query::new())
            .await
            .map_err(normalize)?;
        Ok(Archive {
            format,
            git_ref: git_ref.to_string(),
            size: bytes.len(),
            content_base64: STANDARD.encode(&bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_body_encodes_content_and_omits_unset_fields() {
        let params = WriteFileParams {
            owner: "o".into(),
            repo: "r".into(),
            path: "README.md".into(),
            message: "add readme".into(),
            content: "hello".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(params.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "message": "add readme", "content": "aGVsbG8=" })
        );
    }

    #[test]
    fn delete_body_keeps_locator_out() {
        let params = DeleteFileParams {
            owner: "o".into(),
            repo: "r".into(),
            path: "a.txt".into(),
            message: "rm".into(),
            sha: "abc".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "rm", "sha": "abc" }));
    }
}
