//! Shared-secret check for the admin report routes

use axum::extract::{rejection::QueryRejection, Query};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// `?password=` query parameter; absent means empty
#[derive(Debug, Default, Deserialize)]
pub struct PasswordQuery {
    #[serde(default)]
    pub password: String,
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verify the supplied password against the configured secret.
///
/// With no secret configured every request is rejected.
pub fn authorize(secret: Option<&str>, supplied: &str) -> Result<(), ApiError> {
    match secret {
        Some(secret) if constant_time_eq_str(secret, supplied) => Ok(()),
        _ => {
            tracing::warn!("Rejected admin request with invalid password");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Check the `?password=` query of an admin request.
///
/// A query string that cannot be parsed (for example a repeated
/// `password`) carries no usable password and is rejected as unauthorized.
pub fn authorize_query(
    secret: Option<&str>,
    query: Result<Query<PasswordQuery>, QueryRejection>,
) -> Result<(), ApiError> {
    match query {
        Ok(Query(query)) => authorize(secret, &query.password),
        Err(rejection) => {
            tracing::warn!(
                "Rejected admin request with unreadable query: {}",
                rejection.body_text()
            );
            Err(ApiError::Unauthorized)
        }
    }
}
