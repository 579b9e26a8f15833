use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT token claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as ObjectId hex)
    pub sub: String,
    pub email: String,
    /// Role at issue time. The auth gate trusts the stored record, not this claim.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// access or refresh
    pub token_type: String,
    /// Unique token id
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Token pair containing access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, Copy)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Error types for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
    #[error("Invalid token type: expected {expected}, got {actual}")]
    InvalidTokenType { expected: String, actual: String },
}

pub trait JwtTokenUtils {
    fn generate_access_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError>;
    fn generate_refresh_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError>;
    fn generate_token_pair(&self, user_id: &str, email: &str, role: &str) -> Result<TokenPair, JwtError>;
    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }

    fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        token_type: TokenType,
        expires_in_minutes: i64,
    ) -> Result<String, JwtError> {
        debug!("Generating {} token for user: {} with role: {}", token_type.as_str(), user_id, role);

        let now = Utc::now();
        let expiration = now + Duration::minutes(expires_in_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            token_type: token_type.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.jwt_config.jwt_issuer.clone(),
            aud: self.jwt_config.jwt_audience.clone(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());

        encode(&header, &claims, &encoding_key).map_err(|err| {
            error!("Failed to encode JWT token: {}", err);
            JwtError::EncodingFailed(err.to_string())
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match &self.jwt_config.jwt_issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &self.jwt_config.jwt_audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Verifies signature, expiry, issuer and audience, then the `token_type` claim when one is expected.
    pub fn validate_token(&self, token: &str, expected: Option<TokenType>) -> Result<Claims, JwtError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());
        let claims = decode::<Claims>(token, &decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => {
                    warn!("Rejected expired token");
                    JwtError::TokenExpired
                }
                _ => {
                    warn!("Rejected token: {}", err);
                    JwtError::DecodingFailed(err.to_string())
                }
            })?;

        match expected {
            Some(kind) if claims.token_type != kind.as_str() => {
                warn!(user_id = %claims.sub, "Expected {} token, got {}", kind.as_str(), claims.token_type);
                Err(JwtError::InvalidTokenType {
                    expected: kind.as_str().to_string(),
                    actual: claims.token_type,
                })
            }
            _ => {
                debug!(user_id = %claims.sub, "Token accepted");
                Ok(claims)
            }
        }
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_access_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError> {
        self.generate_token(user_id, email, role, TokenType::Access, self.jwt_config.access_token_expiration)
    }

    fn generate_refresh_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError> {
        self.generate_token(user_id, email, role, TokenType::Refresh, self.jwt_config.refresh_token_expiration)
    }

    fn generate_token_pair(&self, user_id: &str, email: &str, role: &str) -> Result<TokenPair, JwtError> {
        let token_pair = TokenPair {
            access_token: self.generate_access_token(user_id, email, role)?,
            refresh_token: self.generate_refresh_token(user_id, email, role)?,
            expires_in: self.jwt_config.access_token_expiration * 60,
            token_type: "Bearer".to_string(),
        };
        info!("Successfully generated token pair for user: {}", user_id);
        Ok(token_pair)
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Access))
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Refresh))
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(JwtError::InvalidToken)?;
        if token.is_empty() {
            return Err(JwtError::InvalidToken);
        }
        Ok(token.to_string())
    }
}
