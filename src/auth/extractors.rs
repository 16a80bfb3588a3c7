use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{
    auth::{cookies::session_token, repo_types::User},
    error::ApiError,
    state::AppState,
};

/// Resolves the session cookie to a stored user, or rejects with 401 before
/// the handler runs.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar).ok_or(ApiError::Unauthenticated)?;

        let claims = state.keys.validate(token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            ApiError::Unauthenticated
        })?;

        match state.users.find_by_id(claims.user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id = %claims.user_id, "session for unknown user");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
