use async_trait::async_trait;

use super::{AuthError, Principal};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Resolves a bearer token to the caller it identifies.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the principal for `token`, or `AuthError::InvalidCredentials`.
    async fn authenticate(&self, token: &str) -> Result<Principal>;
}
