use serde::{Deserialize, Serialize};

/// Access level granted to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(name: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name, vec![Role::User])
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self::new(name, vec![Role::Admin])
    }

    /// Returns true when the principal holds `role`. Admins implicitly hold `User`.
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::User => self.roles.iter().any(|r| matches!(r, Role::User | Role::Admin)),
            Role::Admin => self.roles.contains(&Role::Admin),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
