use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        authors::{
            clear_authors_cache, create_author, delete_author, get_author, list_authors,
            update_author,
        },
        books::{clear_books_cache, create_book, delete_book, get_book, list_books, update_book},
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API routes with CORS
    let api_routes = Router::new()
        // Author routes
        .route("/authors", get(list_authors).post(create_author))
        .route("/authors/clear-cache", post(clear_authors_cache))
        .route(
            "/authors/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        // Book routes
        .route("/books", get(list_books).post(create_book))
        .route("/books/clear-cache", post(clear_books_cache))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
