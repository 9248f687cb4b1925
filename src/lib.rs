//! GitHub REST operations behind a method-name dispatch layer.
//!
//! [`GitHubClient`] exposes one typed async method per upstream operation.
//! [`Server`] routes `{method, params}` requests to those methods and wraps
//! every outcome in a success/error envelope; [`tools::tool_descriptors`]
//! describes the same methods for callers that discover them at runtime.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod methods;
pub mod server;
pub mod tools;

pub use client::GitHubClient;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use methods::Method;
pub use server::{Request, Response, Server};
