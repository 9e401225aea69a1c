//! Transport collaborator.
//!
//! The client hands a finished [`RequestSpec`] to a [`Transport`] and gets
//! back a status and body. Pooling, TLS, timeouts and threading belong to the
//! transport. It must answer exactly once per call and must not retry.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tineye_auth::{HttpMethod, RequestSpec};

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub trait Transport: Send + Sync {
    /// Send one request. Non-2xx statuses are errors.
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest transport (no Tokio runtime required).
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .default_headers(header_map(&config.extra_headers)?)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { http })
    }

    /// Client with a fixed timeout and no extra headers.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::new(&ClientConfig::default().with_timeout(timeout))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &RequestSpec) -> Result<HttpResponse, TransportError> {
        let url = request.url();
        let mut req = match request.method {
            HttpMethod::Get => self.http.get(&url).query(&request.query),
            HttpMethod::Post => self.http.post(&url),
        };

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.body {
            req = req.body(form.encode());
        }

        let response = req.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!("{} {} -> HTTP {} ({} bytes)", request.method, url, status, body.len());

        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(HttpResponse { status, body })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Build(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Build(format!("invalid value for header {}: {}", name, e)))?;
        map.append(name, value);
    }
    Ok(map)
}
