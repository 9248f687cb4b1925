use crate::config::Config;
use crate::error::{ApiError, Failure, CONFIG_ERROR};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateMeta {
    pub remaining: Option<i32>,
    pub used: Option<i32>,
    pub reset_at: Option<String>,
}

pub fn build_client(cfg: &Config) -> Result<Client, Failure> {
    let mut default_headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|e| config_failure(format!("Invalid user agent: {}", e)))?;
    default_headers.insert(USER_AGENT, ua);
    // Authorization header is injected per request so it is dropped on cross-host redirects.
    let builder = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls();
    builder.build().map_err(Failure::from)
}

fn auth_header(token: &str) -> Result<HeaderValue, Failure> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| config_failure("GitHub token contains invalid header characters"))?;
    value.set_sensitive(true);
    Ok(value)
}

fn config_failure(message: impl Into<String>) -> Failure {
    Failure::Api(ApiError::new(message, CONFIG_ERROR))
}

pub fn extract_rate_from_rest(headers: &HeaderMap) -> RateMeta {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i32>().ok());
    let used = headers
        .get("x-ratelimit-used")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i32>().ok());
    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|epoch| chrono::DateTime::<chrono::Utc>::from_timestamp(epoch, 0))
        .map(|t| t.to_rfc3339());
    RateMeta {
        remaining,
        used,
        reset_at,
    }
}

/// Percent-encode a single path segment (slashes included).
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Percent-encode a multi-segment path such as a file path or a git ref,
/// keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(encode_path_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// `/repos/{owner}/{repo}`
pub fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}

/// Ordered query pairs; optional values are skipped when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Turn a non-success response into a [`Failure`]. GitHub error bodies are JSON
/// objects with a `message` field; anything else is kept verbatim as details.
pub fn status_failure(status: StatusCode, text: String) -> Failure {
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(v) => Some(v),
        Err(_) if text.is_empty() => None,
        Err(_) => Some(Value::String(text)),
    };
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string());
    Failure::Status {
        status: status.as_u16(),
        message,
        body,
    }
}

/// Thin authenticated wrapper over `reqwest` for the GitHub REST API.
/// One call, one request: no retries happen at this layer.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    cfg: Config,
}

impl RestClient {
    pub fn new(cfg: Config) -> Result<Self, Failure> {
        cfg.validate().map_err(config_failure)?;
        let client = build_client(&cfg)?;
        Ok(Self { client, cfg })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub async fn get(&self, path: &str, query: &Query) -> Result<Value, Failure> {
        self.get_with_accept(path, query, GITHUB_JSON).await
    }

    /// Like [`get`](Self::get), also returning the status. Statistics endpoints
    /// answer 202 while GitHub is still computing them.
    pub async fn get_with_status(&self, path: &str, query: &Query) -> Result<(u16, Value), Failure> {
        let req = self.request(Method::GET, &self.cfg.api_url, path, query, GITHUB_JSON)?;
        let res = self.execute(req).await?;
        let status = res.status().as_u16();
        Ok((status, decode_json(res).await?))
    }

    pub async fn get_with_accept(
        &self,
        path: &str,
        query: &Query,
        accept: &str,
    ) -> Result<Value, Failure> {
        let req = self.request(Method::GET, &self.cfg.api_url, path, query, accept)?;
        decode_json(self.execute(req).await?).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Failure> {
        self.send_json(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Value, Failure> {
        self.send_json::<Value>(Method::POST, path, None).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Failure> {
        self.send_json(Method::PUT, path, Some(body)).await
    }

    pub async fn put_empty(&self, path: &str) -> Result<Value, Failure> {
        self.send_json::<Value>(Method::PUT, path, None).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Failure> {
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, Failure> {
        self.send_json::<Value>(Method::DELETE, path, None).await
    }

    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, Failure> {
        self.send_json(Method::DELETE, path, Some(body)).await
    }

    /// Raw bytes, following redirects to the storage host (archives, zips).
    pub async fn get_bytes(&self, path: &str, query: &Query) -> Result<Vec<u8>, Failure> {
        let req = self.request(Method::GET, &self.cfg.api_url, path, query, GITHUB_JSON)?;
        let res = self.execute(req).await?;
        Ok(res.bytes().await?.to_vec())
    }

    pub async fn get_text(&self, path: &str) -> Result<String, Failure> {
        let req = self.request(Method::GET, &self.cfg.api_url, path, &Query::new(), GITHUB_JSON)?;
        let res = self.execute(req).await?;
        Ok(res.text().await?)
    }

    /// POST a binary payload to the upload host.
    pub async fn upload(
        &self,
        path: &str,
        query: &Query,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, Failure> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|_| Failure::other(format!("Invalid content type: {}", content_type)))?;
        let req = self
            .request(Method::POST, &self.cfg.upload_url, path, query, GITHUB_JSON)?
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        decode_json(self.execute(req).await?).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, Failure> {
        let mut req = self.request(method, &self.cfg.api_url, path, &Query::new(), GITHUB_JSON)?;
        if let Some(b) = body {
            req = req.json(b);
        }
        decode_json(self.execute(req).await?).await
    }

    fn request(
        &self,
        method: Method,
        base: &str,
        path: &str,
        query: &Query,
        accept: &str,
    ) -> Result<RequestBuilder, Failure> {
        let url = format!("{}{}", base, path);
        let accept = HeaderValue::from_str(accept)
            .map_err(|_| Failure::other(format!("Invalid accept header: {}", accept)))?;
        let mut req = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, auth_header(&self.cfg.token)?)
            .header("X-GitHub-Api-Version", &self.cfg.api_version)
            .header(ACCEPT, accept);
        if !query.pairs().is_empty() {
            req = req.query(query.pairs());
        }
        Ok(req)
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, Failure> {
        let res = req.send().await.map_err(|e| {
            warn!("REST error sending request: {}", e);
            Failure::from(e)
        })?;
        let status = res.status();
        let rate = extract_rate_from_rest(res.headers());
        debug!(
            "REST {} -> {} (rate remaining={:?}, reset_at={:?})",
            res.url().path(),
            status,
            rate.remaining,
            rate.reset_at
        );
        if status.is_success() {
            return Ok(res);
        }
        let text = match res.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("REST error reading {} error body: {}", status, e);
                String::new()
            }
        };
        Err(status_failure(status, text))
    }
}

/// Empty bodies (204 No Content, 202 Accepted) decode to `null`.
async fn decode_json(res: Response) -> Result<Value, Failure> {
    let bytes = res.bytes().await?;
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_skips_absent_values() {
        let q = Query::new()
            .set("state", "open")
            .opt("sort", None::<&str>)
            .opt("per_page", Some(30));
        assert_eq!(
            q.pairs(),
            &[("state", "open".to_string()), ("per_page", "30".to_string())]
        );
    }

    #[test]
    fn status_failure_reads_github_message() {
        let f = status_failure(
            StatusCode::NOT_FOUND,
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#.into(),
        );
        match f {
            Failure::Status {
                status,
                message,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message.as_deref(), Some("Not Found"));
                assert_eq!(body.unwrap()["documentation_url"], "https://docs.github.com");
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }

    #[test]
    fn status_failure_keeps_plain_text_body() {
        let f = status_failure(StatusCode::BAD_GATEWAY, "upstream down".into());
        match f {
            Failure::Status { message, body, .. } => {
                assert_eq!(message, None);
                assert_eq!(body, Some(Value::String("upstream down".into())));
            }
            other => panic!("unexpected failure: {:?}", other),
        }
        assert!(matches!(
            status_failure(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            Failure::Status { body: None, .. }
        ));
    }

    #[tokio::test]
    async fn truncated_error_body_still_reports_status() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = conn.read(&mut buf);
            conn.write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort")
                .unwrap();
        });

        let rest = RestClient::new(Config::new("t").with_base_url(format!("http://{}", addr))).unwrap();
        let failure = rest.get("/repos/o/r", &Query::new()).await.unwrap_err();
        upstream.join().unwrap();
        assert!(matches!(
            failure,
            Failure::Status { status: 500, message: None, body: None }
        ));
    }

    #[test]
    fn repo_and_file_paths_are_encoded() {
        assert_eq!(repo_path("o", "my repo"), "/repos/o/my%20repo");
        assert_eq!(encode_path("docs/Read Me.md"), "docs/Read%20Me.md");
        assert_eq!(encode_path("/heads/feature/x"), "heads/feature/x");
        assert_eq!(encode_path_segment("feature/x"), "feature%2Fx");
    }
}
