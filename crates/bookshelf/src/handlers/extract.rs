//! `Path` and `Query` extractors whose rejections use the JSON error body.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts,
    },
    http::request::Parts,
    response::Response,
};
use serde::de::DeserializeOwned;

use super::error::error_response;

/// Path parameters, rejected with `{"status", "message"}` when they do not parse.
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

/// Query string, rejected with `{"status", "message"}` when it does not decode.
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> Response {
    let message = rejection.body_text();
    tracing::warn!(status = rejection.status().as_u16(), error = %message, "Rejected path parameters");
    error_response(rejection.status(), message)
}

fn query_rejection(rejection: QueryRejection) -> Response {
    let message = rejection.body_text();
    tracing::warn!(status = rejection.status().as_u16(), error = %message, "Rejected query string");
    error_response(rejection.status(), message)
}
