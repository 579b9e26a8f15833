use std::sync::Arc;

use axum::{middleware, routing::{delete, get, post, put}, Router};

use crate::handler::package_handler::{
    create_package_handler,
    delete_package_handler,
    get_package_handler,
    list_packages_handler,
    update_package_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, AuthState};
use crate::service::package_service::PackageServiceImpl;

pub fn package_router(service: Arc<PackageServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public catalogue
    let public = Router::new()
        .route("/packages", get(list_packages_handler))
        .route("/packages/{id}", get(get_package_handler));

    // Admin-protected mutations
    let admin = Router::new()
        .route("/packages", post(create_package_handler))
        .route("/packages/{id}", put(update_package_handler))
        .route("/packages/{id}", delete(delete_package_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(service)
}
