//! HTTP status mapping.
//!
//! Maps access errors to responses at the server boundary.
//!
//! # Strategy
//! - Denials → `404 Not Found`, identical to a file that does not exist
//! - Checker failures → `500 Internal Server Error`
//!
//! A restricted resource is never answered with `403`, so unauthorized
//! callers cannot probe which paths exist.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use super::AccessError;

impl AccessError {
    /// Status code the server answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccessError::Predicate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        if let AccessError::Predicate(e) = &self {
            error!(error = %e, "Media access check failed");
        }
        // Empty body, matching the file server's own 404
        self.status_code().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredicateError;

    #[test]
    fn test_denial_maps_to_not_found() {
        let response = AccessError::not_found("images/a.jpg").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_denial_never_forbidden() {
        let err = AccessError::not_found("profiles/me.png");
        assert_ne!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_predicate_failure_maps_to_server_error() {
        let err = AccessError::Predicate(PredicateError::new("db down"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
