//! User aggregate model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reference::UserRef;

/// Account status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Captures photo evidence on the shop floor
    Operator,
    /// Reviews and approves/rejects documentation
    Inspector,
    /// Manages orders and assignments
    Supervisor,
    /// Full administrative access
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Inspector => "inspector",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "operator" => Some(Self::Operator),
            "inspector" => Some(Self::Inspector),
            "supervisor" => Some(Self::Supervisor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// User aggregate root.
///
/// Optional attributes are statically typed as `Option` fields; there is no
/// runtime probing for their presence. A user may legitimately carry zero
/// roles after load; repositories log that case as a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
    /// Hardware token identifier for badge login, if issued.
    pub nfc_id: Option<String>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            name: None,
            email: email.into(),
            status: UserStatus::Pending,
            roles: Vec::new(),
            nfc_id: None,
        }
    }

    /// Name shown in reference projections: person name when present,
    /// username otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    /// Derive the reference projection for this user.
    pub fn to_ref(&self) -> UserRef {
        UserRef::new(self.id, self.display_name())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn grant_role(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }
}
