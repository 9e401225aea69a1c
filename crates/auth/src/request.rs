//! Request assembly.
//!
//! [`RequestBuilder`] turns an endpoint and caller parameters into a
//! transport-ready [`RequestSpec`]: GET query pairs, or a multipart upload
//! body, plus the headers and authentication fields of the configured
//! strategy.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::canonical::{normalize_file_name, Params};
use crate::multipart::{MultipartForm, OCTET_STREAM};
use crate::stamp::{generate_boundary, RequestStamp};
use crate::strategy::{AuthInput, SigningStrategy, UploadMeta};

/// Name of the binary part of an upload.
pub const IMAGE_UPLOAD_FIELD: &str = "image_upload";

// ── Endpoints ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Search,
    RemainingSearches,
    ImageCount,
}

impl Endpoint {
    /// Logical operation name, as folded into signatures.
    pub fn method_name(&self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::RemainingSearches => "remaining_searches",
            Endpoint::ImageCount => "image_count",
        }
    }

    /// Path relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Search => "search/",
            Endpoint::RemainingSearches => "remaining_searches/",
            Endpoint::ImageCount => "image_count/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        })
    }
}

// ── Request spec ────────────────────────────────────────────────────

/// A fully built request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub endpoint: Endpoint,
    pub base_url: String,
    /// Query pairs in wire order. Empty for uploads.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Multipart body for uploads.
    pub body: Option<MultipartForm>,
}

impl RequestSpec {
    pub fn path(&self) -> &'static str {
        self.endpoint.path()
    }

    /// Absolute URL without the query string.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The signed-mode nonce, if this request carries one.
    pub fn nonce(&self) -> Option<&str> {
        self.query_value("nonce")
            .or_else(|| self.body.as_ref().and_then(|form| form.text_field("nonce")))
    }
}

/// Image bytes plus the caller's filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl UploadPayload {
    pub fn new(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self { bytes: bytes.into(), file_name: file_name.into() }
    }
}

// ── Builder ─────────────────────────────────────────────────────────

const RESERVED_HEADERS: [&str; 2] = ["content-type", "connection"];

/// Builds requests for one base URL and one signing strategy.
///
/// Holds no mutable state; every build draws its own nonce, timestamp and
/// boundary, so a shared builder is safe across threads.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    strategy: Arc<dyn SigningStrategy>,
    static_headers: Vec<(String, String)>,
}

impl RequestBuilder {
    /// `base_url` is used verbatim, both as URL prefix and in signatures.
    pub fn new(base_url: impl Into<String>, strategy: Arc<dyn SigningStrategy>) -> Self {
        let static_headers = strategy.static_headers();
        Self {
            base_url: base_url.into(),
            strategy,
            static_headers,
        }
    }

    /// Add caller headers sent on every request, after the strategy's own.
    ///
    /// Names already set by the strategy, and the `Content-Type` and
    /// `Connection` headers uploads depend on, are skipped.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            let taken = RESERVED_HEADERS.iter().any(|r| r.eq_ignore_ascii_case(&name))
                || self.static_headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(&name));
            if taken {
                debug!("ignoring caller header {} (set by the request builder)", name);
                continue;
            }
            self.static_headers.push((name, value));
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn strategy(&self) -> &dyn SigningStrategy {
        self.strategy.as_ref()
    }

    /// Build a GET request with a fresh nonce and timestamp.
    pub fn get(&self, endpoint: Endpoint, params: &Params) -> RequestSpec {
        self.get_with(endpoint, params, &self.stamp())
    }

    /// Build a GET request with a given stamp.
    pub fn get_with(&self, endpoint: Endpoint, params: &Params, stamp: &RequestStamp) -> RequestSpec {
        let fields = self.strategy.auth_fields(&AuthInput {
            base_url: &self.base_url,
            endpoint,
            params,
            stamp,
            upload: None,
        });

        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| !fields.iter().any(|(name, _)| name == k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.extend(fields.into_iter().map(|(k, v)| (k.to_string(), v)));

        debug!(
            "built GET {} via {} ({} query pairs)",
            endpoint.path(),
            self.strategy.name(),
            query.len()
        );

        RequestSpec {
            method: HttpMethod::Get,
            endpoint,
            base_url: self.base_url.clone(),
            query,
            headers: self.static_headers.clone(),
            body: None,
        }
    }

    /// Build a multipart upload with a fresh stamp and boundary.
    pub fn upload(&self, endpoint: Endpoint, payload: UploadPayload, params: &Params) -> RequestSpec {
        self.upload_with(endpoint, payload, params, &self.stamp(), generate_boundary())
    }

    /// Build a multipart upload with a given stamp and boundary.
    pub fn upload_with(
        &self,
        endpoint: Endpoint,
        payload: UploadPayload,
        params: &Params,
        stamp: &RequestStamp,
        boundary: String,
    ) -> RequestSpec {
        let file_name = normalize_file_name(&payload.file_name);
        let form = MultipartForm::new(boundary);
        let content_type = form.content_type();

        let fields = self.strategy.auth_fields(&AuthInput {
            base_url: &self.base_url,
            endpoint,
            params,
            stamp,
            upload: Some(UploadMeta {
                content_type: &content_type,
                file_name: &file_name,
            }),
        });

        let mut form = form.file(IMAGE_UPLOAD_FIELD, file_name, OCTET_STREAM, payload.bytes);
        for (k, v) in params.iter() {
            if !fields.iter().any(|(name, _)| *name == k) {
                form = form.text(k, v);
            }
        }
        for (k, v) in fields {
            form = form.text(k, v);
        }

        let mut headers = self.static_headers.clone();
        headers.push(("Connection".to_string(), "close".to_string()));
        headers.push(("Content-Type".to_string(), content_type));

        debug!(
            "built POST {} via {} ({} parts)",
            endpoint.path(),
            self.strategy.name(),
            form.parts().len()
        );

        RequestSpec {
            method: HttpMethod::Post,
            endpoint,
            base_url: self.base_url.clone(),
            query: Vec::new(),
            headers,
            body: Some(form),
        }
    }

    /// Strategies without per-request signing get an empty stamp.
    fn stamp(&self) -> RequestStamp {
        if self.strategy.uses_stamp() {
            RequestStamp::fresh()
        } else {
            RequestStamp::new(String::new(), 0)
        }
    }
}
