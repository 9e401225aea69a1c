//! HMAC-SHA256 request signatures.
//!
//! Signing strings are plain concatenations with no separators:
//!
//! ```text
//! GET:  key "GET"  timestamp nonce base_url endpoint "/" canonical_query
//! POST: key "POST" content_type file_name timestamp nonce base_url endpoint "/" canonical_query
//! ```
//!
//! The digest is keyed with the private key and rendered as lowercase hex.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Method-specific part of a signing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedMethod<'a> {
    Get,
    /// Multipart upload. `content_type` is the exact header value that will
    /// be sent (boundary included); `file_name` is already normalized.
    Post {
        content_type: &'a str,
        file_name: &'a str,
    },
}

impl SignedMethod<'_> {
    pub fn verb(&self) -> &'static str {
        match self {
            SignedMethod::Get => "GET",
            SignedMethod::Post { .. } => "POST",
        }
    }
}

/// Everything that goes into one signature. Built per request, used once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext<'a> {
    pub method: SignedMethod<'a>,
    pub nonce: &'a str,
    pub timestamp: u64,
    pub base_url: &'a str,
    /// Logical operation name (`search`, `remaining_searches`, `image_count`).
    pub endpoint: &'a str,
    /// Output of [`crate::canonical::canonical_query`].
    pub canonical_params: &'a str,
}

/// Assemble the raw string that gets signed.
pub fn signing_string(private_key: &str, ctx: &SigningContext<'_>) -> String {
    let mut raw = String::with_capacity(
        private_key.len() + ctx.base_url.len() + ctx.canonical_params.len() + 96,
    );
    raw.push_str(private_key);
    raw.push_str(ctx.method.verb());
    if let SignedMethod::Post { content_type, file_name } = ctx.method {
        raw.push_str(content_type);
        raw.push_str(file_name);
    }
    raw.push_str(&ctx.timestamp.to_string());
    raw.push_str(ctx.nonce);
    raw.push_str(ctx.base_url);
    raw.push_str(ctx.endpoint);
    raw.push('/');
    raw.push_str(ctx.canonical_params);
    raw
}

/// Compute the `api_sig` value for a request.
pub fn compute_signature(private_key: &str, ctx: &SigningContext<'_>) -> String {
    hmac_sha256_hex(private_key.as_bytes(), signing_string(private_key, ctx).as_bytes())
}

/// HMAC-SHA256 of `message` under `key`, lowercase hex.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    // HMAC accepts keys of any length, so the error arm is unreachable.
    HmacSha256::new_from_slice(key).map_or_else(
        |_| String::new(),
        |mut mac| {
            mac.update(message);
            hex::encode(mac.finalize().into_bytes())
        },
    )
}
