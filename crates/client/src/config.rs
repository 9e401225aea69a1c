//! Client configuration.
//!
//! Fixed for the life of a client. Credentials live separately in
//! [`tineye_auth::Credentials`].

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.tineye.com/rest/";
pub const ENV_API_URL: &str = "TINEYE_API_URL";
pub const USER_AGENT: &str = concat!("tineye-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, always ending in `/`. Also part of every signature.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra headers sent on every request.
    pub extra_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: USER_AGENT.to_string(),
            extra_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `TINEYE_API_URL` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(ENV_API_URL).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(url) => Self::default().with_base_url(url),
            None => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

/// Append the trailing `/` endpoint paths are joined onto.
pub(crate) fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
