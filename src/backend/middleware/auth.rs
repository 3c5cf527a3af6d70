/**
 * Bearer Secret Check
 *
 * Administrative routes require `Authorization: Bearer <CRON_SECRET>`.
 * The check is an Axum extractor, so a handler that takes `CronAuthorized`
 * never runs for a request that failed it.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::backend::error::BackendError;
use crate::backend::server::state::{AppState, CronSecret};

/// Proof that the request carried the configured bearer secret
#[derive(Clone, Copy, Debug)]
pub struct CronAuthorized;

/// Check the `Authorization` header against `secret`
pub fn verify_bearer(secret: &CronSecret, authorization: Option<&str>) -> Result<(), BackendError> {
    if !secret.is_configured() {
        tracing::warn!("CRON_SECRET is not configured; rejecting administrative request");
        return Err(BackendError::unauthorized());
    }

    let header = authorization.ok_or_else(|| {
        tracing::warn!("Missing Authorization header");
        BackendError::unauthorized()
    })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized()
    })?;

    if !secret.matches(token) {
        tracing::warn!("Invalid bearer secret");
        return Err(BackendError::unauthorized());
    }

    Ok(())
}

impl FromRequestParts<AppState> for CronAuthorized {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        verify_bearer(&state.cron_secret, authorization)?;
        Ok(CronAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn secret() -> CronSecret {
        CronSecret::new(Some("topsecret".to_string()))
    }

    #[test]
    fn test_valid_bearer() {
        assert!(verify_bearer(&secret(), Some("Bearer topsecret")).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let err = verify_bearer(&secret(), None).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(verify_bearer(&secret(), Some("Basic topsecret")).is_err());
        assert!(verify_bearer(&secret(), Some("topsecret")).is_err());
    }

    #[test]
    fn test_wrong_token() {
        assert!(verify_bearer(&secret(), Some("Bearer nope")).is_err());
    }

    #[test]
    fn test_unconfigured_secret_rejects_everything() {
        let unset = CronSecret::default();
        assert!(verify_bearer(&unset, Some("Bearer ")).is_err());
        assert!(verify_bearer(&unset, Some("Bearer undefined")).is_err());
    }
}
