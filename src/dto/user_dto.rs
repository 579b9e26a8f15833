use serde::{Deserialize, Serialize};

use crate::model::user::{Role, User};
use crate::util::jwt::TokenPair;

/// A user record as exposed over HTTP; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<TokenPair> for AuthTokens {
    fn from(pair: TokenPair) -> Self {
        AuthTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            token_type: pair.token_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAuthResponse {
    pub user: UserResponse,
    pub tokens: AuthTokens,
}
