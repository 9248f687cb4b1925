//! Typed async wrapper over the GitHub REST API.
//!
//! One method per upstream operation. Each logs what it is about to do, sends
//! exactly one request (branch creation may resolve its start point first) and
//! hands any failure to [`normalize`](crate::error::normalize).

mod actions;
mod collaborators;
mod contents;
mod git;
mod issues;
mod pulls;
mod releases;
mod repos;
mod search;
mod webhooks;

pub use actions::{
    expand_log_archive, ArtifactDownload, ListArtifactsParams, ListWorkflowJobsParams,
    ListWorkflowRunsParams, LogFile, WorkflowDispatchParams,
};
pub use collaborators::ListCollaboratorsParams;
pub use contents::{Archive, ArchiveFormat, CommitIdentity, DeleteFileParams, WriteFileParams};
pub use git::{
    BranchProtectionParams, CreateBranchParams, CreateTagParams, ListCommitsParams, MergeBranchParams,
    UpdateReferenceParams,
};
pub use issues::{
    CreateIssueParams, CreateLabelParams, ListIssuesParams, MilestoneParams, UpdateIssueParams,
    UpdateLabelParams,
};
pub use pulls::{CreatePullRequestParams, ListPullRequestsParams, ReviewCommentParams};
pub use releases::{GenerateNotesParams, ReleaseParams, UploadAssetParams};
pub use repos::{CodeFrequency, CreateRepositoryParams, TransferParams, UpdateRepositoryParams};
pub use search::SearchParams;
pub use webhooks::{CreateWebhookParams, ListDeliveriesParams, UpdateWebhookParams};

use crate::config::Config;
use crate::error::{normalize, ApiResult};
use crate::http::{Query, RestClient};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    rest: RestClient,
}

impl GitHubClient {
    pub fn new(cfg: Config) -> ApiResult<Self> {
        let rest = RestClient::new(cfg).map_err(normalize)?;
        info!("GitHub client initialized (api={})", rest.config().api_url);
        Ok(Self { rest })
    }

    pub fn config(&self) -> &Config {
        self.rest.config()
    }
}

/// Optional pagination as supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl Page {
    pub fn new(per_page: Option<u32>, page: Option<u32>) -> Self {
        Self { per_page, page }
    }

    /// Only what the caller set.
    fn query(self) -> Query {
        Query::new()
            .opt("per_page", self.per_page)
            .opt("page", self.page)
    }

    /// Caller values, falling back to the given defaults.
    fn query_or(self, per_page: u32, page: u32) -> Query {
        Query::new()
            .set("per_page", self.per_page.unwrap_or(per_page))
            .set("page", self.page.unwrap_or(page))
    }
}

/// Workflows are addressed by numeric id or by file name (`ci.yml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowId {
    Id(u64),
    FileName(String),
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowId::Id(id) => write!(f, "{}", id),
            WorkflowId::FileName(name) => f.write_str(name),
        }
    }
}

/// `open` / `closed` / `all` filter shared by issue, pull and milestone listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_only_fill_gaps() {
        let q = Page::new(Some(5), None).query_or(30, 1);
        assert_eq!(
            q.pairs(),
            &[("per_page", "5".to_string()), ("page", "1".to_string())]
        );
        assert!(Page::default().query().pairs().is_empty());
    }

    #[test]
    fn workflow_id_accepts_number_or_file_name() {
        let id: WorkflowId = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(id, WorkflowId::Id(42));
        let file: WorkflowId = serde_json::from_value(serde_json::json!("ci.yml")).unwrap();
        assert_eq!(file.to_string(), "ci.yml");
    }
}
