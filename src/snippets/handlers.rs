use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    snippets::{
        dto::{CreateSnippetRequest, UpdateSnippetRequest},
        repo_types::{PublicSnippet, Snippet},
        services::{new_snippet, snippet_changes},
    },
    state::AppState,
};

const NOT_FOUND: ApiError = ApiError::NotFound("Snippet not found");

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/public", get(list_public))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_snippets).post(create_snippet))
        .route(
            "/:id",
            get(get_snippet).put(update_snippet).delete(delete_snippet),
        )
}

/// Malformed ids are reported like any other missing snippet.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| NOT_FOUND)
}

#[instrument(skip_all)]
pub async fn list_snippets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<Snippet>>>> {
    let snippets = state.snippets.list_for_owner(user.id).await?;
    Ok(Json(ApiResponse::data(snippets)))
}

#[instrument(skip(state, user))]
pub async fn get_snippet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Snippet>>> {
    let id = parse_id(&id)?;
    let snippet = state
        .snippets
        .find_owned(id, user.id)
        .await?
        .ok_or(NOT_FOUND)?;
    Ok(Json(ApiResponse::data(snippet)))
}

#[instrument(skip_all)]
pub async fn create_snippet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateSnippetRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Snippet>>)> {
    let Json(payload) = payload?;
    let new = new_snippet(payload)?;
    let snippet = state.snippets.create(user.id, new).await?;
    info!(user_id = %user.id, snippet_id = %snippet.id, "snippet created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(snippet).with_message("Snippet created successfully")),
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn update_snippet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSnippetRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Snippet>>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let snippet = state
        .snippets
        .update_owned(id, user.id, snippet_changes(payload))
        .await?
        .ok_or(NOT_FOUND)?;
    info!(user_id = %user.id, snippet_id = %snippet.id, "snippet updated");
    Ok(Json(
        ApiResponse::data(snippet).with_message("Snippet updated successfully"),
    ))
}

#[instrument(skip(state, user))]
pub async fn delete_snippet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;
    if !state.snippets.delete_owned(id, user.id).await? {
        warn!(user_id = %user.id, snippet_id = %id, "delete of missing or foreign snippet");
        return Err(NOT_FOUND);
    }
    info!(user_id = %user.id, snippet_id = %id, "snippet deleted");
    Ok(Json(ApiResponse::message("Snippet deleted successfully")))
}

#[instrument(skip_all)]
pub async fn list_public(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PublicSnippet>>>> {
    let snippets = state.snippets.list_public().await?;
    Ok(Json(ApiResponse::data(snippets)))
}
