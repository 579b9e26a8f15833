pub mod booking_dto;
pub mod package_dto;
pub mod user_dto;

use serde::{Deserialize, Serialize};

/// Body of responses that carry nothing but a confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse { message: message.into() }
    }
}
