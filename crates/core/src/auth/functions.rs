use super::AuthError;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. An empty token is malformed.
///
/// ```
/// use bookshelf_core::auth::{parse_bearer, AuthError};
///
/// assert_eq!(parse_bearer("Bearer abc"), Ok("abc"));
/// assert_eq!(parse_bearer("Basic abc"), Err(AuthError::MalformedHeader));
/// ```
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
