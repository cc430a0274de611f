use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use bookshelf_core::library::{AuthorPatch, AuthorView, CreateAuthor};

use crate::state::AppState;

use super::{
    authz::RequireAdmin,
    error::parse_json,
    extract::{Path, Query},
    AppError, ListParams,
};

/// List authors, paginated (GET /api/authors?page&limit).
pub async fn list_authors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.authors.list(params.pagination()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Get a single author with its books (GET /api/authors/{id}).
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorView>, AppError> {
    Ok(Json(state.authors.get(id).await?))
}

/// Create an author (POST /api/authors).
pub async fn create_author(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: CreateAuthor = parse_json(&body)?;
    let author = state.authors.create(payload).await?;

    tracing::info!(author_id = author.id, "Created author");

    let location = format!("/api/authors/{}", author.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(author),
    ))
}

/// Overwrite the fields present in the body (PUT /api/authors/{id}).
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let patch: AuthorPatch = parse_json(&body)?;
    state.authors.update(id, patch).await?;

    tracing::info!(author_id = id, "Updated author");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an author and its books (DELETE /api/authors/{id}).
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.authors.delete(id).await?;

    tracing::info!(author_id = id, "Deleted author and its books");
    Ok(StatusCode::NO_CONTENT)
}

/// Evict all cached author listings (POST /api/authors/clear-cache). Admin only.
pub async fn clear_authors_cache(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    state.authors.clear_cache().await?;

    tracing::info!(principal = %principal.name, "Cleared author cache");
    Ok(Json(json!({ "message": "Author cache cleared" })))
}
