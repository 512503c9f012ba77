use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use super::AppState;
use crate::{error::AppError, models::Session};

/// The authenticated user of the current request
///
/// Extracted from an `Authorization: Bearer <token>` header. Handlers that
/// take this argument reject unauthenticated requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

impl CurrentUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

/// Parses the session token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

        let session = state
            .sessions
            .get(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session expired, please log in again".to_string()))?;

        Ok(CurrentUser(session))
    }
}
