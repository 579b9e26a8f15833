use std::sync::Arc;

use axum::{middleware, routing::{get, post, put}, Router};

use crate::handler::booking_handler::{
    cancel_booking_handler,
    create_booking_handler,
    list_bookings_handler,
    update_booking_status_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, auth, AuthState};
use crate::service::booking_service::BookingServiceImpl;

pub fn booking_router(service: Arc<BookingServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Any signed-in user; ownership is checked by the service
    let user = Router::new()
        .route("/bookings", get(list_bookings_handler))
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/{id}/cancel", put(cancel_booking_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), auth));

    let admin = Router::new()
        .route("/bookings/{id}/status", put(update_booking_status_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    user
        .merge(admin)
        .with_state(service)
}
