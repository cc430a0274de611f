use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use bookshelf_core::library::PayloadError;
use bookshelf_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::services::ServiceError;

pub struct AppError(pub anyhow::Error);

/// JSON error body shared by every failing endpoint.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({
        "status": status.as_u16(),
        "message": message.into(),
    });
    (status, Json(body)).into_response()
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            let status = status_from(err.status_code());
            let body = match err {
                ServiceError::Validation(violations) => json!({
                    "status": status.as_u16(),
                    "message": err.to_string(),
                    "violations": violations,
                }),
                _ => json!({ "status": status.as_u16(), "message": err.to_string() }),
            };
            (status, body)
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            let status = status_from(repository_error_to_status_code(err));
            (
                status,
                json!({ "status": status.as_u16(), "message": err.to_string() }),
            )
        } else {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (
                status,
                json!({ "status": status.as_u16(), "message": "Internal server error" }),
            )
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn malformed(err: serde_json::Error) -> ServiceError {
    ServiceError::InvalidPayload(PayloadError::Malformed(err.to_string()))
}

/// Decodes a JSON object request body, reporting syntax and shape errors as a
/// 400-class payload error.
///
/// Any other JSON value is rejected before decoding, since derived struct
/// deserializers would otherwise accept an array and match fields by position.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ServiceError> {
    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    if !value.is_object() {
        return Err(PayloadError::NotAnObject.into());
    }
    serde_json::from_value(value).map_err(malformed)
}
