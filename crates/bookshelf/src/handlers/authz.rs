//! Capability checks for admin-only endpoints.
//!
//! The caller is identified from `Authorization: Bearer <token>` through the
//! injected [`Authenticator`]; handlers only see the resulting principal.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use bookshelf_core::auth::{parse_bearer, AuthError, Authenticator, Principal, Role};

use super::error::error_response;

/// Authorization error that maps to 401 or 403.
#[derive(Debug)]
pub enum AuthzError {
    /// No usable credentials.
    Unauthenticated(AuthError),
    /// Authenticated, but without the required role.
    Forbidden { principal: String, required: Role },
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(err) => {
                tracing::warn!(error = %err, "Authentication failed");
                error_response(StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::Forbidden {
                principal,
                required,
            } => {
                tracing::warn!(
                    principal = %principal,
                    required = %required,
                    "Authorization denied: insufficient role"
                );
                error_response(
                    StatusCode::FORBIDDEN,
                    "Insufficient rights to perform this operation",
                )
            }
        }
    }
}

/// Extractor that only succeeds for principals holding the admin role.
pub struct RequireAdmin(pub Principal);

impl<S> FromRequestParts<S> for RequireAdmin
where
    Arc<dyn Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthzError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = <Arc<dyn Authenticator> as FromRef<S>>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthzError::Unauthenticated(AuthError::MissingCredentials))?
            .to_str()
            .map_err(|_| AuthzError::Unauthenticated(AuthError::MalformedHeader))?;

        let token = parse_bearer(header).map_err(AuthzError::Unauthenticated)?;
        let principal = authenticator
            .authenticate(token)
            .await
            .map_err(AuthzError::Unauthenticated)?;

        if !principal.has_role(Role::Admin) {
            return Err(AuthzError::Forbidden {
                principal: principal.name,
                required: Role::Admin,
            });
        }

        Ok(RequireAdmin(principal))
    }
}
