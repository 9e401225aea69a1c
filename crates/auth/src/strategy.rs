//! Signing strategies.
//!
//! The API has shipped two authentication schemes. A client picks one at
//! construction and the request path never branches on it again:
//!
//! - [`SignedStrategy`] adds `api_sig`, `api_key`, `nonce` and `date` to
//!   every request, with the signature computed over the canonical request.
//! - [`HeaderKeyStrategy`] adds nothing per request; its key travels in a
//!   static `x-api-key` header.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::canonical::{canonical_query, Params};
use crate::credentials::{redact, Credentials};
use crate::request::Endpoint;
use crate::signature::{compute_signature, SignedMethod, SigningContext};
use crate::stamp::RequestStamp;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Field names the signed strategy owns. Caller values under these names
/// never reach the wire, so they stay out of the signature as well.
const SIGNED_FIELDS: [&str; 4] = ["api_sig", "api_key", "nonce", "date"];

/// Upload-specific inputs to the signature.
#[derive(Debug, Clone, Copy)]
pub struct UploadMeta<'a> {
    /// Exact `Content-Type` header value, boundary included.
    pub content_type: &'a str,
    /// Normalized filename.
    pub file_name: &'a str,
}

/// Inputs a strategy may draw on when authorizing one request.
#[derive(Debug, Clone, Copy)]
pub struct AuthInput<'a> {
    pub base_url: &'a str,
    pub endpoint: Endpoint,
    pub params: &'a Params,
    pub stamp: &'a RequestStamp,
    /// `Some` for multipart uploads, `None` for GET queries.
    pub upload: Option<UploadMeta<'a>>,
}

pub trait SigningStrategy: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Headers sent on every request. Read once, when the client is built.
    fn static_headers(&self) -> Vec<(String, String)>;

    /// Fields appended to the query (GET) or form (upload), in wire order.
    fn auth_fields(&self, input: &AuthInput<'_>) -> Vec<(&'static str, String)>;

    /// Whether `auth_fields` uses the nonce and timestamp.
    fn uses_stamp(&self) -> bool;
}

/// Build the strategy matching a set of credentials.
pub fn strategy_for(credentials: Credentials) -> Arc<dyn SigningStrategy> {
    match credentials {
        Credentials::Signed { private_key, public_key } => {
            Arc::new(SignedStrategy::new(private_key, public_key))
        }
        Credentials::HeaderKey { api_key } => Arc::new(HeaderKeyStrategy::new(api_key)),
    }
}

// ── Signed (HMAC) ───────────────────────────────────────────────────

pub struct SignedStrategy {
    private_key: String,
    public_key: String,
}

impl SignedStrategy {
    pub fn new(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }

    /// Compute the signature for a request without building it.
    pub fn sign(&self, input: &AuthInput<'_>) -> String {
        let canonical = if input.params.iter().any(|(k, _)| SIGNED_FIELDS.contains(&k)) {
            let kept: Params = input
                .params
                .iter()
                .filter(|(k, _)| !SIGNED_FIELDS.contains(k))
                .collect();
            canonical_query(&kept)
        } else {
            canonical_query(input.params)
        };
        let method = match input.upload {
            None => SignedMethod::Get,
            Some(meta) => SignedMethod::Post {
                content_type: meta.content_type,
                file_name: meta.file_name,
            },
        };

        let ctx = SigningContext {
            method,
            nonce: &input.stamp.nonce,
            timestamp: input.stamp.timestamp,
            base_url: input.base_url,
            endpoint: input.endpoint.method_name(),
            canonical_params: &canonical,
        };
        trace!(
            "signing {} {} ({} canonical bytes)",
            method.verb(),
            ctx.endpoint,
            canonical.len()
        );

        compute_signature(&self.private_key, &ctx)
    }
}

impl SigningStrategy for SignedStrategy {
    fn name(&self) -> &'static str {
        "signed"
    }

    fn static_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn auth_fields(&self, input: &AuthInput<'_>) -> Vec<(&'static str, String)> {
        let api_sig = self.sign(input);
        let date = input.stamp.timestamp.to_string();
        let nonce = input.stamp.nonce.clone();
        let api_key = self.public_key.clone();

        if input.upload.is_some() {
            vec![("api_sig", api_sig), ("api_key", api_key), ("date", date), ("nonce", nonce)]
        } else {
            vec![("api_sig", api_sig), ("api_key", api_key), ("nonce", nonce), ("date", date)]
        }
    }

    fn uses_stamp(&self) -> bool {
        true
    }
}

impl fmt::Debug for SignedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedStrategy")
            .field("private_key", &"<redacted>")
            .field("public_key", &redact(&self.public_key))
            .finish()
    }
}

// ── Static header key ───────────────────────────────────────────────

pub struct HeaderKeyStrategy {
    api_key: String,
}

impl HeaderKeyStrategy {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl SigningStrategy for HeaderKeyStrategy {
    fn name(&self) -> &'static str {
        "header-key"
    }

    fn static_headers(&self) -> Vec<(String, String)> {
        vec![(API_KEY_HEADER.to_string(), self.api_key.clone())]
    }

    fn auth_fields(&self, _input: &AuthInput<'_>) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn uses_stamp(&self) -> bool {
        false
    }
}

impl fmt::Debug for HeaderKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderKeyStrategy")
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}
