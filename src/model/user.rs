use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::util::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Identity attached to a request once its bearer token has been resolved to a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Returns `None` for records that were never persisted.
    pub fn from_user(user: &User) -> Option<Self> {
        Some(AuthenticatedUser {
            id: user.id?,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Owners act on their own records; admins act on anyone's.
    pub fn can_act_for(&self, owner: &ObjectId) -> bool {
        self.is_admin() || &self.id == owner
    }
}
