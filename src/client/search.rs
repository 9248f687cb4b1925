use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult};
use crate::http::Query;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query shared by all search endpoints. `repository_id` is used by label search only;
/// topic search ignores `sort` and `order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub repository_id: Option<u64>,
    #[serde(flatten)]
    pub page: Page,
}

impl SearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }

    fn query(&self, ordered: bool) -> Query {
        let mut query = Query::new()
            .opt("repository_id", self.repository_id)
            .set("q", &self.q);
        if ordered {
            query = query
                .opt("sort", self.sort.as_deref())
                .opt("order", self.order.as_deref());
        }
        query
            .opt("per_page", self.page.per_page)
            .opt("page", self.page.page)
    }
}

impl GitHubClient {
    async fn search(&self, kind: &str, params: &SearchParams, ordered: bool) -> ApiResult<Value> {
        info!("Searching {}: {}", kind, params.q);
        let path = format!("/search/{}", kind);
        self.rest
            .get(&path, &params.query(ordered))
            .await
            .map_err(normalize)
    }

    pub async fn search_repositories(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("repositories", params, true).await
    }

    pub async fn search_code(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("code", params, true).await
    }

    pub async fn search_commits(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("commits", params, true).await
    }

    pub async fn search_issues(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("issues", params, true).await
    }

    pub async fn search_users(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("users", params, true).await
    }

    pub async fn search_topics(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("topics", params, false).await
    }

    pub async fn search_labels(&self, params: &SearchParams) -> ApiResult<Value> {
        self.search("labels", params, true).await
    }
}
