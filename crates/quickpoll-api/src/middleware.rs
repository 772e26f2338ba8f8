use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use quickpoll_core::AppState;
use serde::Deserialize;

use crate::error::ApiError;

/// The caller's voter token, resolved by the configured identifier.
pub struct Voter {
    pub token: String,
}

impl FromRequestParts<AppState> for Voter {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Voter {
            token: state.voter_identifier.identify(&parts.headers),
        })
    }
}

#[derive(Deserialize)]
struct SecretQuery {
    secret: Option<String>,
}

/// Extractor that requires `?secret=` to match the configured admin secret.
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = Query::<SecretQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.secret)
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        if !quickpoll_util::secret::secrets_match(&provided, &state.config.admin_secret) {
            tracing::warn!("admin listing rejected: secret mismatch");
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminAccess)
    }
}
