use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role required for every email-template operation.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// User roles
    #[serde(default)]
    pub roles: Vec<String>,
    /// Additional custom claims
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

/// Identity facts handed to the service layer.
///
/// The service never inspects tokens or sessions itself; it only consumes
/// the already-established "who is calling and are they an admin" facts,
/// which keeps the whole service layer testable without an HTTP stack.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Stable identifier of the caller (JWT subject), recorded in audit rows.
    pub id: String,
    /// Whether the caller holds the admin role.
    pub admin: bool,
}

impl Actor {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            admin: claims.has_role(ADMIN_ROLE),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}
