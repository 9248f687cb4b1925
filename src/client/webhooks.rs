use super::{GitHubClient, Page};
use crate::error::{normalize, ApiResult};
use crate::http::{repo_path, Query};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_events() -> Vec<String> {
    vec!["push".to_string()]
}

fn default_active() -> bool {
    true
}

/// `config` carries `url`, `content_type`, `secret` and `insecure_ssl` as GitHub
/// defines them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebhookParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    pub config: Value,
    #[serde(default = "default_events")]
    pub events: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWebhookParams {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    #[serde(skip_serializing)]
    pub hook_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Deliveries are paged by opaque `cursor`, not by page number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDeliveriesParams {
    pub owner: String,
    pub repo: String,
    pub hook_id: u64,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub redelivery: Option<bool>,
}

fn hook_path(owner: &str, repo: &str, hook_id: u64) -> String {
    format!("{}/hooks/{}", repo_path(owner, repo), hook_id)
}

impl GitHubClient {
    pub async fn list_webhooks(&self, owner: &str, repo: &str, page: Page) -> ApiResult<Value> {
        info!("Listing webhooks for {}/{}", owner, repo);
        let path = format!("{}/hooks", repo_path(owner, repo));
        self.rest.get(&path, &page.query()).await.map_err(normalize)
    }

    pub async fn get_webhook(&self, owner: &str, repo: &str, hook_id: u64) -> ApiResult<Value> {
        info!("Fetching webhook {} of {}/{}", hook_id, owner, repo);
        self.rest
            .get(&hook_path(owner, repo, hook_id), &Query::new())
            .await
            .map_err(normalize)
    }

    pub async fn create_webhook(&self, params: &CreateWebhookParams) -> ApiResult<Value> {
        info!("Creating webhook in {}/{}", params.owner, params.repo);
        let path = format!("{}/hooks", repo_path(&params.owner, &params.repo));
        self.rest.post(&path, params).await.map_err(normalize)
    }

    pub async fn update_webhook(&self, params: &UpdateWebhookParams) -> ApiResult<Value> {
        info!(
            "Updating webhook {} of {}/{}",
            params.hook_id, params.owner, params.repo
        );
        self.rest
            .patch(&hook_path(&params.owner, &params.repo, params.hook_id), params)
            .await
            .map_err(normalize)
    }

    pub async fn delete_webhook(&self, owner: &str, repo: &str, hook_id: u64) -> ApiResult<()> {
        info!("Deleting webhook {} of {}/{}", hook_id, owner, repo);
        self.rest
            .delete(&hook_path(owner, repo, hook_id))
            .await
            .map_err(normalize)?;
        Ok(())
    }

    pub async fn ping_webhook(&self, owner: &str, repo: &str, hook_id: u64) -> ApiResult<()> {
        info!("Pinging webhook {} of {}/{}", hook_id, owner, repo);
        let path = format!("{}/pings", hook_path(owner, repo, hook_id));
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    /// Triggers the hook with the latest push, if it subscribes to `push`.
    pub async fn test_webhook(&self, owner: &str, repo: &str, hook_id: u64) -> ApiResult<()> {
        info!("Testing webhook {} of {}/{}", hook_id, owner, repo);
        let path = format!("{}/tests", hook_path(owner, repo, hook_id));
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }

    pub async fn list_webhook_deliveries(&self, params: &ListDeliveriesParams) -> ApiResult<Value> {
        info!(
            "Listing deliveries of webhook {} in {}/{}",
            params.hook_id, params.owner, params.repo
        );
        let path = format!(
            "{}/deliveries",
            hook_path(&params.owner, &params.repo, params.hook_id)
        );
        let query = Query::new()
            .opt("per_page", params.per_page)
            .opt("cursor", params.cursor.as_deref())
            .opt("redelivery", params.redelivery);
        self.rest.get(&path, &query).await.map_err(normalize)
    }

    pub async fn get_webhook_delivery(
        &self,
        owner: &str,
        repo: &str,
        hook_id: u64,
        delivery_id: u64,
    ) -> ApiResult<Value> {
        info!(
            "Fetching delivery {} of webhook {} in {}/{}",
            delivery_id, hook_id, owner, repo
        );
        let path = format!("{}/deliveries/{}", hook_path(owner, repo, hook_id), delivery_id);
        self.rest.get(&path, &Query::new()).await.map_err(normalize)
    }

    pub async fn redeliver_webhook(
        &self,
        owner: &str,
        repo: &str,
        hook_id: u64,
        delivery_id: u64,
    ) -> ApiResult<()> {
        info!(
            "Redelivering delivery {} of webhook {} in {}/{}",
            delivery_id, hook_id, owner, repo
        );
        let path = format!(
            "{}/deliveries/{}/attempts",
            hook_path(owner, repo, hook_id),
            delivery_id
        );
        self.rest.post_empty(&path).await.map_err(normalize)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_defaults_to_active_push_hook() {
        let params: CreateWebhookParams = serde_json::from_value(json!({
            "owner": "o", "repo": "r",
            "config": { "url": "https://example.com/hook", "content_type": "json" }
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "config": { "url": "https://example.com/hook", "content_type": "json" },
                "events": ["push"],
                "active": true,
            })
        );
    }
}
