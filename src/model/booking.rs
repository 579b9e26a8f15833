use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

impl BookingStatus {
    /// Statuses that hold a user's claim on a package.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Cancelled is terminal; staying in the same state is always allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (*self, next),
            (Pending, Pending)
                | (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Confirmed)
                | (Confirmed, Cancelled)
                | (Cancelled, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A user's claim on a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub package_id: ObjectId,
    pub status: BookingStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Booking {
    pub fn pending(user_id: ObjectId, package_id: ObjectId) -> Self {
        Booking {
            id: None,
            user_id,
            package_id,
            status: BookingStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A booking together with the package it points at; `None` once the package is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedBooking {
    pub booking: Booking,
    pub package: Option<Package>,
}
