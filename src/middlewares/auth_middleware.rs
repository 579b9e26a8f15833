use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::model::user::AuthenticatedUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<UserServiceImpl>,
}

/// Owned copy of the `Authorization` header, taken before any await point.
fn authorization_header(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl AuthState {
    pub fn new(jwt_utils: Arc<JwtTokenUtilsImpl>, user_service: Arc<UserServiceImpl>) -> Self {
        AuthState { jwt_utils, user_service }
    }

    async fn identify(&self, auth_header: Option<String>) -> Result<AuthenticatedUser, HandlerError> {
        let auth_header = auth_header.ok_or_else(|| HandlerError::unauthorized("No token, authorization denied"))?;
        let token = self
            .jwt_utils
            .extract_token_from_header(&auth_header)
            .map_err(|_| HandlerError::unauthorized("No token, authorization denied"))?;
        self.user_service.authenticate(&token).await.map_err(|e| {
            warn!("Rejected bearer token: {e}");
            HandlerError::from(e)
        })
    }
}

/// Requires a valid access token and attaches the resolved `AuthenticatedUser` to the request.
pub async fn auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = authorization_header(&req);
    let user = state.identify(auth_header).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Same as [`auth`], and the stored account must also hold the admin role.
pub async fn admin_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = authorization_header(&req);
    let user = state.identify(auth_header).await?;
    if !user.is_admin() {
        warn!(user_id = %user.id, "Admin access denied");
        return Err(HandlerError::new(HandlerErrorKind::Forbidden, "Admin access required"));
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
