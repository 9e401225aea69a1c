//! API credentials and the named sandbox defaults.
//!
//! Credentials are fixed for the life of a client. `Debug` never prints
//! secret material.

use std::fmt;

use thiserror::Error;

/// Public sandbox credentials published for trying the API.
///
/// They only reach a client through [`Credentials::sandbox`], never as a
/// silent fallback.
pub mod sandbox {
    pub const PRIVATE_KEY: &str = "6mm60lsCNIB,FwOWjJqA80QZHh9BMwc-ber4u=t^";
    pub const PUBLIC_KEY: &str = "LCkn,2K7osVwkX95K4Oy";
    pub const API_KEY: &str = "6mm60lsCNIB,FwOWjJqA80QZHh9BMwc-ber4u=t^";
}

pub const ENV_PRIVATE_KEY: &str = "TINEYE_PRIVATE_KEY";
pub const ENV_PUBLIC_KEY: &str = "TINEYE_PUBLIC_KEY";
pub const ENV_API_KEY: &str = "TINEYE_API_KEY";

/// Which authentication scheme the target API version expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Per-request HMAC signature with a private/public key pair.
    Signed,
    /// Static `x-api-key` header.
    HeaderKey,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("missing API credential (set {0})")]
    Missing(&'static str),
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Signed { private_key: String, public_key: String },
    HeaderKey { api_key: String },
}

impl Credentials {
    pub fn signed(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        Credentials::Signed {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }

    pub fn header_key(api_key: impl Into<String>) -> Self {
        Credentials::HeaderKey { api_key: api_key.into() }
    }

    /// Sandbox credentials for the given mode.
    pub fn sandbox(mode: AuthMode) -> Self {
        match mode {
            AuthMode::Signed => Self::signed(sandbox::PRIVATE_KEY, sandbox::PUBLIC_KEY),
            AuthMode::HeaderKey => Self::header_key(sandbox::API_KEY),
        }
    }

    /// Read credentials from the environment.
    ///
    /// Values are trimmed; a blank variable counts as missing.
    pub fn from_env(mode: AuthMode) -> Result<Self, CredentialsError> {
        Self::resolve(mode, None, |var| std::env::var(var).ok())
    }

    /// Resolve credentials: explicit value > environment lookup > error.
    ///
    /// `explicit` is the private key (signed) or API key (header mode); the
    /// public key always comes from `lookup`.
    pub fn resolve(
        mode: AuthMode,
        explicit: Option<String>,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, CredentialsError> {
        let pick = |explicit: Option<String>, var: &'static str| {
            explicit
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
                .ok_or(CredentialsError::Missing(var))
        };

        match mode {
            AuthMode::Signed => {
                let private_key = pick(explicit, ENV_PRIVATE_KEY)?;
                let public_key = pick(None, ENV_PUBLIC_KEY)?;
                Ok(Self::signed(private_key, public_key))
            }
            AuthMode::HeaderKey => Ok(Self::header_key(pick(explicit, ENV_API_KEY)?)),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Credentials::Signed { .. } => AuthMode::Signed,
            Credentials::HeaderKey { .. } => AuthMode::HeaderKey,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Signed { public_key, .. } => f
                .debug_struct("Signed")
                .field("private_key", &"<redacted>")
                .field("public_key", &redact(public_key))
                .finish(),
            Credentials::HeaderKey { api_key } => f
                .debug_struct("HeaderKey")
                .field("api_key", &redact(api_key))
                .finish(),
        }
    }
}

/// Show only the first four characters of a key.
pub(crate) fn redact(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}…", prefix)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_sandbox_credentials_per_mode() {
        assert_eq!(Credentials::sandbox(AuthMode::Signed).mode(), AuthMode::Signed);
        assert_eq!(
            Credentials::sandbox(AuthMode::HeaderKey),
            Credentials::header_key(sandbox::API_KEY)
        );
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let signed = Credentials::signed("super-secret-private", "public-key-123");
        let out = format!("{:?}", signed);
        assert!(!out.contains("super-secret-private"));
        assert!(!out.contains("public-key-123"));
        assert!(out.contains("<redacted>"));

        let header = Credentials::header_key("api-key-abcdef");
        assert!(!format!("{:?}", header).contains("api-key-abcdef"));
    }

    #[test]
    fn test_resolve_explicit_wins_over_env() {
        let creds = Credentials::resolve(
            AuthMode::HeaderKey,
            Some("  explicit  ".into()),
            env(&[(ENV_API_KEY, "from-env")]),
        )
        .unwrap();
        assert_eq!(creds, Credentials::header_key("explicit"));
    }

    #[test]
    fn test_resolve_falls_back_to_env() {
        let creds = Credentials::resolve(
            AuthMode::Signed,
            None,
            env(&[(ENV_PRIVATE_KEY, " priv "), (ENV_PUBLIC_KEY, "pub")]),
        )
        .unwrap();
        assert_eq!(creds, Credentials::signed("priv", "pub"));
    }

    #[test]
    fn test_resolve_blank_explicit_uses_env() {
        let creds = Credentials::resolve(
            AuthMode::HeaderKey,
            Some("   ".into()),
            env(&[(ENV_API_KEY, "k")]),
        )
        .unwrap();
        assert_eq!(creds, Credentials::header_key("k"));
    }

    #[test]
    fn test_resolve_missing_names_the_variable() {
        let err = Credentials::resolve(AuthMode::Signed, None, env(&[(ENV_PRIVATE_KEY, "p")]))
            .unwrap_err();
        assert_eq!(err, CredentialsError::Missing(ENV_PUBLIC_KEY));
        assert!(err.to_string().contains("TINEYE_PUBLIC_KEY"));

        let err = Credentials::resolve(AuthMode::HeaderKey, None, env(&[(ENV_API_KEY, "  ")]))
            .unwrap_err();
        assert_eq!(err, CredentialsError::Missing(ENV_API_KEY));
    }
}
