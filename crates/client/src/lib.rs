//! TinEye API client. Blocking, single-shot calls.
//!
//! Four operations: search by URL, search by upload, remaining searches and
//! image count. Authentication (signed HMAC or static header key) comes
//! from `tineye-auth`; the HTTP round trip goes through a [`Transport`],
//! reqwest by default.
//!
//! No retries. No caching. No response schema: results come back as the
//! decoded JSON tree.
//!
//! ```no_run
//! use tineye_client::{ApiClient, AuthMode, Params};
//!
//! let api = ApiClient::sandbox(AuthMode::Signed)?;
//! let found = api.search_url_with(
//!     "https://tineye.com/images/meloncat.jpg",
//!     &Params::new().with("limit", 10),
//! )?;
//! println!("{}", found["results"]["matches"]);
//! # Ok::<(), tineye_client::ApiError>(())
//! ```

mod client;
mod config;
mod decode;
mod error;
mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL, ENV_API_URL, USER_AGENT};
pub use decode::decode_response;
pub use error::{ApiError, TransportError};
pub use transport::{HttpResponse, ReqwestTransport, Transport};

pub use tineye_auth::{AuthMode, Credentials, CredentialsError, Params, RequestSpec};
