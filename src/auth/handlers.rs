use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        cookies::{clear_session, set_session},
        dto::{AuthPayload, LoginRequest, SignupRequest, UpdateProfileRequest},
        extractors::CurrentUser,
        repo_types::User,
        services,
    },
    error::ApiResult,
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/verify", get(get_me))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<ApiResponse<AuthPayload>>)> {
    let Json(payload) = payload?;
    let (user, token) = services::signup(&state, payload).await?;
    let jar = set_session(jar, &token, state.config.environment);
    let body = ApiResponse::data(AuthPayload { user, token })
        .with_message("User registered successfully");
    Ok((StatusCode::CREATED, jar, Json(body)))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<ApiResponse<AuthPayload>>)> {
    let Json(payload) = payload?;
    let (user, token) = services::login(&state, payload).await?;
    let jar = set_session(jar, &token, state.config.environment);
    let body = ApiResponse::data(AuthPayload { user, token }).with_message("Login successful");
    Ok((jar, Json(body)))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::data(user))
}

#[instrument(skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let Json(payload) = payload?;
    let updated = services::update_profile(&state, &user, payload).await?;
    Ok(Json(
        ApiResponse::data(updated).with_message("Profile updated successfully"),
    ))
}

/// Drops the cookie only; the token stays valid until it expires.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    info!(user_id = %user.id, "user logged out");
    (
        clear_session(jar, state.config.environment),
        Json(ApiResponse::message("Logged out successfully")),
    )
}
