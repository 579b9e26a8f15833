use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::model::user::AuthenticatedUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 64))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 10))]
    pub refresh_token: String,
}

// Register
pub async fn register_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.email = payload.email.trim().to_string();
    payload.name = payload.name.trim().to_string();
    payload.validate().map_err(HandlerError::validation)?;
    let res = service.register(payload.name, payload.email, payload.password).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.email = payload.email.trim().to_string();
    payload.validate().map_err(HandlerError::validation)?;
    let res = service.login(payload.email, payload.password).await?;
    Ok(Json(res))
}

// Refresh Token
pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let res = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(res))
}

// Current user
pub async fn me_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let res = service.profile(&user.id).await?;
    Ok(Json(res))
}
