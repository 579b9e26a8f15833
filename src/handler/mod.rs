pub mod booking_handler;
pub mod package_handler;
pub mod user_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Path ids must be 24-char hex ObjectIds; anything else is a client error.
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}
