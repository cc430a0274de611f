use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use bookshelf_core::library::BookView;

use crate::state::AppState;

use super::{
    authz::RequireAdmin,
    error::parse_json,
    extract::{Path, Query},
    AppError, ListParams,
};

/// List books, paginated (GET /api/books?page&limit).
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.books.list(params.pagination()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Get a single book with its author (GET /api/books/{id}).
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookView>, AppError> {
    Ok(Json(state.books.get(id).await?))
}

/// Create a book (POST /api/books). Admin only.
///
/// `author` may be an existing author ID or an inline author object.
pub async fn create_book(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: Value = parse_json(&body)?;
    let book = state.books.create(payload).await?;

    tracing::info!(book_id = book.id, principal = %principal.name, "Created book");

    let location = format!("/api/books/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Update a book (PUT /api/books/{id}). Admin only.
///
/// The author is reassigned from `idAuthor`; omitting it detaches the author.
pub async fn update_book(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let payload: Value = parse_json(&body)?;
    state.books.update(id, payload).await?;

    tracing::info!(book_id = id, principal = %principal.name, "Updated book");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book (DELETE /api/books/{id}). Admin only.
pub async fn delete_book(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.books.delete(id).await?;

    tracing::info!(book_id = id, principal = %principal.name, "Deleted book");
    Ok(StatusCode::NO_CONTENT)
}

/// Evict all cached book listings (POST /api/books/clear-cache). Admin only.
pub async fn clear_books_cache(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    state.books.clear_cache().await?;

    tracing::info!(principal = %principal.name, "Cleared book cache");
    Ok(Json(json!({ "message": "Book cache cleared" })))
}
