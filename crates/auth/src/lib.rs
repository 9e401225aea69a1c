//! Request authentication for the TinEye REST API.
//!
//! This crate is the single source of truth for how a request is
//! authenticated: parameter canonicalization, HMAC signing strings, nonce and
//! boundary generation, multipart encoding, and the two signing strategies.
//!
//! No I/O. No HTTP client. Everything here is deterministic given a
//! [`RequestStamp`] and a boundary, which is what makes exact-value tests
//! against the server's expectations possible.

pub mod canonical;
pub mod credentials;
pub mod multipart;
pub mod request;
pub mod signature;
pub mod stamp;
pub mod strategy;

pub use canonical::{canonical_query, normalize_file_name, ParamValue, Params};
pub use credentials::{sandbox, AuthMode, Credentials, CredentialsError};
pub use multipart::{MultipartForm, Part, PartData};
pub use request::{Endpoint, HttpMethod, RequestBuilder, RequestSpec, UploadPayload};
pub use signature::{compute_signature, signing_string, SignedMethod, SigningContext};
pub use stamp::RequestStamp;
pub use strategy::{
    strategy_for, AuthInput, HeaderKeyStrategy, SignedStrategy, SigningStrategy, UploadMeta,
    API_KEY_HEADER,
};
