use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::model::booking::{Booking, BookingStatus, PopulatedBooking};
use crate::model::user::AuthenticatedUser;
use crate::repository::booking_repo::BookingRepository;
use crate::repository::package_repo::PackageRepository;
use crate::service::package_service::PACKAGE_NOT_FOUND;
use crate::util::error::ServiceError;

const BOOKING_NOT_FOUND: &str = "Booking not found";
const CONCURRENT_CHANGE: &str = "Booking was modified by another request, please retry";

#[async_trait]
pub trait BookingService: Send + Sync {
    /// The caller's bookings, newest first, each with its package.
    async fn list_user_bookings(&self, acting: &AuthenticatedUser) -> Result<Vec<PopulatedBooking>, ServiceError>;
    async fn create_booking(&self, acting: &AuthenticatedUser, package_id: &ObjectId)
        -> Result<PopulatedBooking, ServiceError>;
    async fn update_booking_status(
        &self,
        id: &ObjectId,
        status: BookingStatus,
        acting: &AuthenticatedUser,
    ) -> Result<PopulatedBooking, ServiceError>;
    async fn cancel_booking(&self, id: &ObjectId, acting: &AuthenticatedUser) -> Result<PopulatedBooking, ServiceError>;
}

pub struct BookingServiceImpl {
    pub booking_repo: Arc<dyn BookingRepository>,
    pub package_repo: Arc<dyn PackageRepository>,
}

impl BookingServiceImpl {
    pub fn new(booking_repo: Arc<dyn BookingRepository>, package_repo: Arc<dyn PackageRepository>) -> Self {
        Self { booking_repo, package_repo }
    }

    async fn find_booking(&self, id: &ObjectId) -> Result<Booking, ServiceError> {
        self.booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(BOOKING_NOT_FOUND.to_string()))
    }

    async fn populate(&self, booking: Booking) -> Result<PopulatedBooking, ServiceError> {
        let package = self.package_repo.find_by_id(&booking.package_id).await?;
        Ok(PopulatedBooking { booking, package })
    }
}

#[async_trait]
impl BookingService for BookingServiceImpl {
    #[instrument(skip(self, acting), fields(user_id = %acting.id))]
    async fn list_user_bookings(&self, acting: &AuthenticatedUser) -> Result<Vec<PopulatedBooking>, ServiceError> {
        let bookings = self.booking_repo.list_by_user(&acting.id).await;
        if let Err(e) = &bookings {
            error!("Failed to list bookings: {e}");
        }
        let bookings = bookings?;

        let mut package_ids: Vec<ObjectId> = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            if !package_ids.contains(&booking.package_id) {
                package_ids.push(booking.package_id);
            }
        }
        let packages: HashMap<ObjectId, _> = self
            .package_repo
            .find_by_ids(&package_ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        info!("Listed {} bookings", bookings.len());
        Ok(bookings
            .into_iter()
            .map(|booking| {
                let package = packages.get(&booking.package_id).cloned();
                PopulatedBooking { booking, package }
            })
            .collect())
    }

    #[instrument(skip(self, acting), fields(user_id = %acting.id, package_id = %package_id))]
    async fn create_booking(
        &self,
        acting: &AuthenticatedUser,
        package_id: &ObjectId,
    ) -> Result<PopulatedBooking, ServiceError> {
        let package = self
            .package_repo
            .find_by_id(package_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PACKAGE_NOT_FOUND.to_string()))?;

        let res = self.booking_repo.insert_active(Booking::pending(acting.id, *package_id)).await;
        if let Err(e) = &res {
            warn!("Booking not created: {e}");
        }
        let booking = res?;

        // A delete may have cascaded between the lookup and the insert.
        if self.package_repo.find_by_id(package_id).await?.is_none() {
            if let Some(id) = booking.id {
                self.booking_repo
                    .compare_and_set_status(&id, BookingStatus::Pending, BookingStatus::Cancelled)
                    .await?;
            }
            warn!("Package deleted while booking, booking cancelled");
            return Err(ServiceError::NotFound(PACKAGE_NOT_FOUND.to_string()));
        }
        info!("Booking created successfully");
        Ok(PopulatedBooking { booking, package: Some(package) })
    }

    #[instrument(skip(self, acting), fields(id = %id, status = %status, admin = %acting.id))]
    async fn update_booking_status(
        &self,
        id: &ObjectId,
        status: BookingStatus,
        acting: &AuthenticatedUser,
    ) -> Result<PopulatedBooking, ServiceError> {
        acting.require_admin()?;
        let booking = self.find_booking(id).await?;
        if booking.status == status {
            info!("Booking already has the requested status");
            return self.populate(booking).await;
        }
        if !booking.status.can_transition_to(status) {
            warn!("Rejected booking status change from {}", booking.status);
            return Err(ServiceError::Conflict(format!(
                "Cannot change booking status from {} to {}",
                booking.status, status
            )));
        }
        let updated = self
            .booking_repo
            .compare_and_set_status(id, booking.status, status)
            .await?
            .ok_or_else(|| ServiceError::Conflict(CONCURRENT_CHANGE.to_string()))?;
        info!("Booking status updated successfully");
        self.populate(updated).await
    }

    #[instrument(skip(self, acting), fields(id = %id, user_id = %acting.id))]
    async fn cancel_booking(&self, id: &ObjectId, acting: &AuthenticatedUser) -> Result<PopulatedBooking, ServiceError> {
        let booking = self.find_booking(id).await?;
        if !acting.can_act_for(&booking.user_id) {
            warn!("User is not allowed to cancel this booking");
            return Err(ServiceError::Forbidden("Not authorized to cancel this booking".to_string()));
        }
        if booking.status == BookingStatus::Cancelled {
            info!("Booking already cancelled");
            return self.populate(booking).await;
        }

        let cancelled = match self
            .booking_repo
            .compare_and_set_status(id, booking.status, BookingStatus::Cancelled)
            .await?
        {
            Some(cancelled) => cancelled,
            // Lost a race; cancelling is still satisfied if the other writer cancelled too.
            None => match self.find_booking(id).await? {
                current if current.status == BookingStatus::Cancelled => current,
                _ => return Err(ServiceError::Conflict(CONCURRENT_CHANGE.to_string())),
            },
        };
        info!("Booking cancelled successfully");
        self.populate(cancelled).await
    }
}
