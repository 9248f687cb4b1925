use std::env;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the GitHub REST client.
///
/// The library never reads the environment on its own; embedders either build a
/// `Config` directly or opt into [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub upload_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Configuration for github.com with the given bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point the client at an alternate API host (GitHub Enterprise Server).
    /// The upload host is derived from it: `/api/v3` becomes `/api/uploads`,
    /// any other base is used as-is.
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        self.upload_url = derive_upload_url(&api_url);
        self.api_url = api_url;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - GITHUB_TOKEN (or GH_TOKEN) [required]
    /// - GITHUB_API_URL (default: https://api.github.com)
    /// - GITHUB_UPLOAD_URL (default: derived from GITHUB_API_URL)
    /// - GITHUB_API_VERSION (default: 2022-11-28)
    /// - GITHUB_HTTP_TIMEOUT_SECS (default: 30)
    /// - GITHUB_USER_AGENT (default: github-tools/<version>)
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .map_err(|_| "Missing GITHUB_TOKEN or GH_TOKEN".to_string())?;

        let mut cfg = Config::new(token);
        if let Ok(api_url) = env::var("GITHUB_API_URL") {
            cfg = cfg.with_base_url(api_url);
        }
        if let Ok(upload_url) = env::var("GITHUB_UPLOAD_URL") {
            cfg.upload_url = upload_url.trim_end_matches('/').to_string();
        }
        if let Ok(version) = env::var("GITHUB_API_VERSION") {
            cfg.api_version = version;
        }
        if let Some(secs) = env::var("GITHUB_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            cfg.timeout_secs = secs;
        }
        if let Ok(ua) = env::var("GITHUB_USER_AGENT") {
            cfg.user_agent = ua;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Both base URLs must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<(), String> {
        for (label, raw) in [("api_url", &self.api_url), ("upload_url", &self.upload_url)] {
            let parsed =
                url::Url::parse(raw).map_err(|e| format!("Invalid {}: {} ({})", label, raw, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("Invalid {}: unsupported scheme {}", label, parsed.scheme()));
            }
        }
        if self.token.trim().is_empty() {
            return Err("GitHub token must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("github-tools/{}", env!("CARGO_PKG_VERSION"))
}

fn derive_upload_url(api_url: &str) -> String {
    if api_url == DEFAULT_API_URL {
        return DEFAULT_UPLOAD_URL.to_string();
    }
    match api_url.strip_suffix("/api/v3") {
        Some(host) => format!("{}/api/uploads", host),
        None => api_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enterprise_base_derives_upload_host() {
        let cfg = Config::new("t").with_base_url("https://ghe.example.com/api/v3/");
        assert_eq!(cfg.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(cfg.upload_url, "https://ghe.example.com/api/uploads");
    }

    #[test]
    fn plain_base_reuses_itself_for_uploads() {
        let cfg = Config::new("t").with_base_url("http://127.0.0.1:5000");
        assert_eq!(cfg.upload_url, "http://127.0.0.1:5000");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_garbage() {
        let cfg = Config::new("t").with_base_url("not a url");
        assert!(cfg.validate().is_err());
        assert!(Config::new("  ").validate().is_err());
    }
}
