use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::dto::booking_dto::{BookingMessageResponse, BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::handler::parse_object_id;
use crate::model::booking::BookingStatus;
use crate::model::user::AuthenticatedUser;
use crate::service::booking_service::{BookingService, BookingServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_bookings_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let bookings = service.list_user_bookings(&user).await?;
    let body: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(body))
}

pub async fn create_booking_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let package_id = parse_object_id(&payload.package_id, "package")?;
    let booking = service.create_booking(&user, &package_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingMessageResponse {
            message: "Booking created successfully".to_string(),
            booking: booking.into(),
        }),
    ))
}

pub async fn update_booking_status_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "booking")?;
    payload.validate().map_err(HandlerError::validation)?;
    let status = payload
        .status
        .parse::<BookingStatus>()
        .map_err(|e| HandlerError::bad_request(e.to_string()))?;
    let booking = service.update_booking_status(&id, status, &user).await?;
    Ok(Json(BookingMessageResponse {
        message: "Booking status updated successfully".to_string(),
        booking: booking.into(),
    }))
}

pub async fn cancel_booking_handler(
    State(service): State<Arc<BookingServiceImpl>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "booking")?;
    let booking = service.cancel_booking(&id, &user).await?;
    Ok(Json(BookingMessageResponse {
        message: "Booking cancelled successfully".to_string(),
        booking: booking.into(),
    }))
}
