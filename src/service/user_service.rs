use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::user_dto::{AuthTokens, UserAuthResponse, UserResponse};
use crate::model::user::{AuthenticatedUser, Role, User};
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, name: String, email: String, password: String) -> Result<UserAuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError>;
    /// Resolves an access token to the stored user it was issued for.
    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, ServiceError>;
    async fn profile(&self, id: &ObjectId) -> Result<UserResponse, ServiceError>;
    /// Returns the existing account for `email`, or creates it with the admin role.
    async fn ensure_admin(&self, name: String, email: String, password: String) -> Result<User, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }

    fn issue_tokens(&self, user: &User) -> Result<AuthTokens, ServiceError> {
        let user_id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User record has no id".to_string()))?;
        self.jwt_utils
            .generate_token_pair(&user_id.to_hex(), &user.email, user.role.as_str())
            .map(AuthTokens::from)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    fn auth_response(&self, user: User) -> Result<UserAuthResponse, ServiceError> {
        let tokens = self.issue_tokens(&user)?;
        Ok(UserAuthResponse { user: UserResponse::from(user), tokens })
    }

    async fn create_user(&self, name: String, email: String, password: &str, role: Role) -> Result<User, ServiceError> {
        let email = normalize_email(&email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Email already registered");
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }
        let password_hash = PasswordUtilsImpl::hash_password(password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;
        let user = User {
            id: None,
            name: name.trim().to_string(),
            email,
            password_hash,
            role,
            created_at: None,
            updated_at: None,
        };
        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(_) => info!("User inserted successfully"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        inserted.map_err(ServiceError::from)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, name, password), fields(email = %email))]
    async fn register(&self, name: String, email: String, password: String) -> Result<UserAuthResponse, ServiceError> {
        info!("Registering new user");
        let user = self.create_user(name, email, &password, Role::User).await?;
        self.auth_response(user)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError> {
        info!("User login attempt");
        let user_opt = self.user_repo.find_by_email(&normalize_email(&email)).await;
        match &user_opt {
            Ok(Some(_)) => info!("User found for login"),
            Ok(None) => warn!("User not found for login"),
            Err(e) => error!("Failed to fetch user for login: {e}"),
        }
        let user = user_opt?.ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            warn!("Invalid credentials");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        info!("User logged in successfully");
        self.auth_response(user)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError> {
        info!("Refreshing token");
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;
        let tokens = self.issue_tokens(&user)?;
        info!("Token refreshed successfully");
        Ok(tokens)
    }

    async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, ServiceError> {
        let claims = self
            .jwt_utils
            .validate_access_token(access_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Token is not valid: {}", e)))?;
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Token is not valid".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Token is not valid".to_string()))?;
        AuthenticatedUser::from_user(&user)
            .ok_or_else(|| ServiceError::InternalError("User record has no id".to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn profile(&self, id: &ObjectId) -> Result<UserResponse, ServiceError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self, name, password), fields(email = %email))]
    async fn ensure_admin(&self, name: String, email: String, password: String) -> Result<User, ServiceError> {
        if let Some(existing) = self.user_repo.find_by_email(&normalize_email(&email)).await? {
            if existing.role != Role::Admin {
                warn!("Bootstrap admin email belongs to a non-admin account");
            }
            info!("Admin user already exists, skipping creation");
            return Ok(existing);
        }
        let admin = self.create_user(name, email, &password, Role::Admin).await?;
        info!("First admin user created");
        Ok(admin)
    }
}
