//! TinEye API client.
//!
//! Blocking, single-shot calls: build the request, send it once, decode the
//! body. No retries, no caching, no state carried between calls.

use std::io::Read;
use std::sync::Arc;

use log::debug;
use serde_json::Value;
use tineye_auth::{
    strategy_for, AuthMode, Credentials, Endpoint, Params, RequestBuilder, RequestSpec,
    UploadPayload,
};

use crate::config::{normalize_base_url, ClientConfig};
use crate::decode::decode_response;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};

/// Image search API client (blocking).
///
/// Cheap to clone and safe to share between threads; each call draws its
/// own nonce, timestamp and boundary.
#[derive(Clone)]
pub struct ApiClient {
    requests: RequestBuilder,
    mode: AuthMode,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client backed by the default reqwest transport.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Create a client around an injected transport.
    ///
    /// `base_url` and `extra_headers` are applied to every request. Timeout
    /// and user agent are connection settings and belong to the transport.
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let mode = credentials.mode();
        let requests = RequestBuilder::new(normalize_base_url(config.base_url), strategy_for(credentials))
            .with_headers(config.extra_headers);
        Self { requests, mode, transport }
    }

    /// Client using the public sandbox credentials for `mode`.
    pub fn sandbox(mode: AuthMode) -> Result<Self, ApiError> {
        Self::new(Credentials::sandbox(mode), ClientConfig::default())
    }

    /// Credentials and base URL from the environment.
    pub fn from_env(mode: AuthMode) -> Result<Self, ApiError> {
        Self::new(Credentials::from_env(mode)?, ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.mode
    }

    /// The underlying transport.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Search using an image the server downloads from `url`.
    pub fn search_url(&self, url: &str) -> Result<Value, ApiError> {
        self.search_url_with(url, &Params::new())
    }

    /// [`search_url`](Self::search_url) with extra search parameters
    /// (`limit`, `offset`, `sort`, …).
    pub fn search_url_with(&self, url: &str, params: &Params) -> Result<Value, ApiError> {
        let params = params.clone().with("image_url", url);
        self.execute(self.requests.get(Endpoint::Search, &params))
    }

    /// Search by uploading image bytes.
    pub fn search_data(&self, bytes: impl Into<Vec<u8>>, file_name: &str) -> Result<Value, ApiError> {
        self.search_data_with(bytes, file_name, &Params::new())
    }

    pub fn search_data_with(
        &self,
        bytes: impl Into<Vec<u8>>,
        file_name: &str,
        params: &Params,
    ) -> Result<Value, ApiError> {
        let payload = UploadPayload::new(bytes, file_name);
        self.execute(self.requests.upload(Endpoint::Search, payload, params))
    }

    /// Search by uploading everything `reader` yields.
    pub fn search_reader(
        &self,
        mut reader: impl Read,
        file_name: &str,
        params: &Params,
    ) -> Result<Value, ApiError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.search_data_with(bytes, file_name, params)
    }

    /// Searches left in the current bundle.
    pub fn remaining_searches(&self) -> Result<Value, ApiError> {
        self.execute(self.requests.get(Endpoint::RemainingSearches, &Params::new()))
    }

    /// Number of images in the index.
    pub fn image_count(&self) -> Result<Value, ApiError> {
        self.execute(self.requests.get(Endpoint::ImageCount, &Params::new()))
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn execute(&self, request: RequestSpec) -> Result<Value, ApiError> {
        debug!(
            "{} {} via {} strategy (nonce: {})",
            request.method,
            request.path(),
            self.requests.strategy().name(),
            request.nonce().unwrap_or("-")
        );

        let response = self.transport.send(&request)?;
        decode_response(&response.body)
    }
}
