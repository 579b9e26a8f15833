use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::package_dto::PackageResponse;
use crate::model::booking::{BookingStatus, PopulatedBooking};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(equal = 24))] // MongoDB ObjectId hex string
    pub package_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookingStatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub package: Option<PackageResponse>,
    pub status: BookingStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<PopulatedBooking> for BookingResponse {
    fn from(populated: PopulatedBooking) -> Self {
        let booking = populated.booking;
        BookingResponse {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            package: populated.package.map(PackageResponse::from),
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingMessageResponse {
    pub message: String,
    pub booking: BookingResponse,
}
