//! Method-name dispatch over [`GitHubClient`] with a uniform success/error envelope.

mod handlers;

use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::{normalize, ApiError, ApiResult, INTERNAL_ERROR, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::methods::Method;
use crate::tools::{tool_descriptors, ToolDescriptor};
use futures::future::Either;
use futures::{FutureExt, StreamExt};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use uuid::Uuid;

const DEFAULT_INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Requests read from stdin that may be in flight at once.
const MAX_IN_FLIGHT: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    fn internal() -> Self {
        Self::new(INTERNAL_ERROR, DEFAULT_INTERNAL_MESSAGE)
    }
}

impl From<ApiError> for ErrorInfo {
    fn from(e: ApiError) -> Self {
        let code = if e.code().trim().is_empty() {
            INTERNAL_ERROR.to_string()
        } else {
            e.code().to_string()
        };
        let message = if e.message().trim().is_empty() {
            DEFAULT_INTERNAL_MESSAGE.to_string()
        } else {
            e.message().to_string()
        };
        Self {
            code,
            message,
            details: e.details().cloned(),
        }
    }
}

/// Outcome of one request: `data` on success, `error` otherwise, never both.
/// Only built through [`Response::ok`] and [`Response::failure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct Server {
    client: GitHubClient,
}

impl Server {
    pub fn new(cfg: Config) -> ApiResult<Self> {
        Ok(Self::with_client(GitHubClient::new(cfg)?))
    }

    pub fn with_client(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn tools(&self) -> &'static [ToolDescriptor] {
        tool_descriptors()
    }

    /// Dispatch one request. Never fails: every outcome is an envelope.
    pub async fn handle_request(&self, req: Request) -> Response {
        let request_id = Uuid::new_v4();
        info!("[{}] Handling request: {}", request_id, req.method);
        let Some(method) = Method::from_name(&req.method) else {
            warn!("[{}] Unknown method: {}", request_id, req.method);
            return Response::failure(ErrorInfo::new(
                METHOD_NOT_FOUND,
                format!("Method '{}' not found", req.method),
            ));
        };
        let response = respond(method, self.call(method, req.params)).await;
        debug!(
            "[{}] {} finished (success={})",
            request_id,
            method,
            response.is_success()
        );
        response
    }
}

/// Await a handler and wrap its outcome. Errors with a blank code or message
/// and panics are reported as `INTERNAL_ERROR`.
pub async fn respond<T, F>(method: Method, fut: F) -> Response
where
    T: Serialize,
    F: Future<Output = ApiResult<T>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => match serde_json::to_value(value) {
            Ok(data) => Response::ok(data),
            Err(e) => Response::failure(ErrorInfo::from(normalize(e.into()))),
        },
        Ok(Err(e)) => {
            debug!("{} failed: {}", method, e);
            Response::failure(ErrorInfo::from(e))
        }
        Err(panic) => {
            error!("Handler for {} panicked: {}", method, panic_message(&*panic));
            Response::failure(ErrorInfo::internal())
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[derive(Deserialize)]
struct WireRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct WireResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(flatten)]
    response: Response,
}

async fn handle_line(server: &Server, line: String) -> WireResponse {
    match serde_json::from_str::<WireRequest>(&line) {
        Ok(wire) => {
            let req = Request::new(wire.method, wire.params.unwrap_or_default());
            WireResponse {
                id: wire.id,
                response: server.handle_request(req).await,
            }
        }
        Err(e) => {
            warn!("Unparseable request line: {}", e);
            WireResponse {
                id: None,
                response: Response::failure(ErrorInfo::new(
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                )),
            }
        }
    }
}

/// Serve newline-delimited JSON requests from stdin until EOF. Replies are
/// written one per line, in request order.
pub async fn run_stdio(server: Server) -> anyhow::Result<()> {
    info!(
        "Starting github-tools stdio server ({} tools)",
        server.tools().len()
    );
    serve(&server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("stdin closed; shutting down");
    Ok(())
}

/// The stdio loop over any line source and sink. A read failure stops the
/// loop after earlier replies are written and is returned to the caller.
pub async fn serve<R, W>(server: &Server, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let lines = futures::stream::unfold(Some(reader.lines()), |state| async move {
        let mut lines = state?;
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), Some(lines))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    });

    let mut replies = pin!(lines
        .filter(|item| {
            futures::future::ready(item.as_ref().map_or(true, |line| !line.trim().is_empty()))
        })
        .map(|item| match item {
            Ok(line) => Either::Left(handle_line(server, line).map(Ok::<_, std::io::Error>)),
            Err(e) => Either::Right(futures::future::ready(Err(e))),
        })
        .buffered(MAX_IN_FLIGHT));

    while let Some(reply) = replies.next().await {
        let reply = reply.map_err(|e| {
            warn!("Failed to read request line: {}", e);
            anyhow::Error::new(e).context("failed to read request line")
        })?;
        let mut payload = serde_json::to_string(&reply)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
