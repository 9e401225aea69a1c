//! Per-request entropy: nonce, timestamp, multipart boundary.
//!
//! Nothing here is cached or shared. Each call draws fresh values, so
//! concurrent requests never contend on state.

use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix used for multipart boundaries.
const BOUNDARY_PREFIX: &str = "---------------------";

/// Nonce and timestamp captured when a request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStamp {
    pub nonce: String,
    /// Unix epoch seconds.
    pub timestamp: u64,
}

impl RequestStamp {
    /// Draw a new nonce and read the clock.
    pub fn fresh() -> Self {
        Self {
            nonce: generate_nonce(),
            timestamp: unix_timestamp(),
        }
    }

    /// Fixed stamp, for reproducible requests.
    pub fn new(nonce: impl Into<String>, timestamp: u64) -> Self {
        Self { nonce: nonce.into(), timestamp }
    }
}

/// 32 lowercase hex characters from a random UUID.
pub fn generate_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current Unix time in seconds. A clock before the epoch reads as 0.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// High-entropy multipart boundary.
///
/// A random integer and the nanosecond clock are hashed; the boundary is the
/// dash prefix followed by 32 hex characters of the digest. Hex never clashes
/// with the dash run, and a 128-bit token will not turn up inside a payload
/// by accident.
pub fn generate_boundary() -> String {
    let seed: u64 = rand::random();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(&nanos.to_le_bytes());
    let digest = hasher.finalize().to_hex();

    format!("{}{}", BOUNDARY_PREFIX, &digest.as_str()[..32])
}
