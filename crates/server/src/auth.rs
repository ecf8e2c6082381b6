//! Bearer-token authentication extractor.
//!
//! Auth is an external collaborator here: a static token table maps bearer
//! tokens to user identities. Handlers that take an [`AuthUser`] argument
//! reject unauthenticated requests with 401 before running.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use catalog::UserId;

/// The authenticated caller, populated from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let user_id = state
            .tokens
            .get(token)
            .copied()
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser { user_id })
    }
}
