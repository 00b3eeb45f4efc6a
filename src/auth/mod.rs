//! Authentication module
//!
//! Resolves the identity behind an HTTP request for the media server. The
//! access layer only consumes the result; any scheme that yields a
//! [`Principal`] can be plugged in through [`Authenticator`].

pub mod token;

pub use token::TokenAuthenticator;

use crate::access_control::Principal;
use crate::config::AuthConfig;
use axum::http::HeaderMap;
use std::sync::Arc;

/// Resolves request headers to an authenticated principal
pub trait Authenticator: Send + Sync {
    /// `None` means the request is anonymous
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;

    /// Short description of the scheme (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Shared handle to an authenticator
pub type SharedAuthenticator = Arc<dyn Authenticator>;

/// Treats every request as anonymous
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authenticate(&self, _headers: &HeaderMap) -> Option<Principal> {
        None
    }

    fn auth_type(&self) -> &'static str {
        "none"
    }
}

/// Create an authenticator from configuration
pub fn create_authenticator(config: &AuthConfig) -> SharedAuthenticator {
    if config.tokens.is_empty() {
        Arc::new(NoAuth)
    } else {
        Arc::new(TokenAuthenticator::from_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::util::SecretString;

    #[test]
    fn test_no_tokens_means_no_auth() {
        let auth = create_authenticator(&AuthConfig::default());
        assert_eq!(auth.auth_type(), "none");
        assert!(auth.authenticate(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_tokens_enable_bearer_auth() {
        let config = AuthConfig {
            tokens: vec![TokenConfig {
                token: SecretString::new("t0k"),
                principal: "alice".to_string(),
                groups: vec![],
            }],
        };
        assert_eq!(create_authenticator(&config).auth_type(), "bearer");
    }
}
