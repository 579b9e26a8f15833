pub mod booking_router;
pub mod package_router;
pub mod user_router;

use std::sync::Arc;

use axum::Router;

use crate::middlewares::auth_middleware::AuthState;
use crate::service::booking_service::BookingServiceImpl;
use crate::service::package_service::PackageServiceImpl;
use crate::service::user_service::UserServiceImpl;

/// Every REST route, mounted under `/api`.
pub fn api_router(
    user_service: Arc<UserServiceImpl>,
    package_service: Arc<PackageServiceImpl>,
    booking_service: Arc<BookingServiceImpl>,
    auth_state: Arc<AuthState>,
) -> Router {
    let api = Router::new()
        .merge(user_router::user_router(user_service, auth_state.clone()))
        .merge(package_router::package_router(package_service, auth_state.clone()))
        .merge(booking_router::booking_router(booking_service, auth_state));
    Router::new().nest("/api", api)
}
