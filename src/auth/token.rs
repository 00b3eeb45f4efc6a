//! Bearer token authentication
//!
//! Static tokens from configuration, each mapped to a principal and its
//! groups.

use crate::access_control::Principal;
use crate::auth::Authenticator;
use crate::config::{AuthConfig, TokenConfig};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use tracing::debug;

/// Authenticates `Authorization: Bearer <token>` headers
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    tokens: Vec<TokenConfig>,
}

impl TokenAuthenticator {
    pub fn new(tokens: Vec<TokenConfig>) -> Self {
        Self { tokens }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.tokens.clone())
    }

    fn bearer_token(headers: &HeaderMap) -> Option<&str> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let presented = Self::bearer_token(headers)?;

        match self.tokens.iter().find(|t| t.token.matches(presented)) {
            Some(entry) => Some(
                Principal::new(entry.principal.clone()).with_groups(entry.groups.iter().cloned()),
            ),
            None => {
                // Unknown tokens are treated as anonymous
                debug!("Unrecognized bearer token");
                None
            }
        }
    }

    fn auth_type(&self) -> &'static str {
        "bearer"
    }
}
