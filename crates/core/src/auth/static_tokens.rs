use std::collections::HashMap;

use async_trait::async_trait;

use super::{AuthError, Authenticator, Principal, Result};

/// Authenticator backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as identifying `principal`, replacing any previous entry.
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Principal> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn authenticator() -> StaticTokenAuthenticator {
        StaticTokenAuthenticator::new()
            .with_token("user-token", Principal::user("user@bookapi.com"))
            .with_token("admin-token", Principal::admin("admin@bookapi.com"))
    }

    #[tokio::test]
    async fn test_resolves_known_tokens() {
        let auth = authenticator();

        let admin = auth.authenticate("admin-token").await.unwrap();
        assert_eq!(admin.name, "admin@bookapi.com");
        assert!(admin.has_role(Role::Admin));

        let user = auth.authenticate("user-token").await.unwrap();
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_rejects_unknown_token() {
        let result = authenticator().authenticate("nope").await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }
}
