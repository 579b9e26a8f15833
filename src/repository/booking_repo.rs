use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::{error, info, warn};

use crate::model::booking::{Booking, BookingStatus};
use crate::model::timestamp;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `booking` unless the same user already holds an active booking on the same
    /// package, in which case nothing is written and `AlreadyExists` is returned. The check
    /// and the write are a single atomic operation.
    async fn insert_active(&self, booking: Booking) -> RepositoryResult<Booking>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Booking>>;
    /// Newest first.
    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Booking>>;
    /// Moves the booking to `next` only if its stored status is still `expected`.
    /// `None` when the booking is gone or its status changed in the meantime.
    async fn compare_and_set_status(
        &self,
        id: &ObjectId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> RepositoryResult<Option<Booking>>;
    /// Cancels every active booking on the package; returns how many were cancelled.
    async fn cancel_active_for_package(&self, package_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoBookingRepository {
    collection: Collection<Booking>,
}

fn active_statuses() -> Vec<&'static str> {
    BookingStatus::ACTIVE.iter().map(BookingStatus::as_str).collect()
}

impl MongoBookingRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoBookingRepository { collection: db.collection::<Booking>(collection_name) }
    }

    /// Partial filters with `$in` need MongoDB 6.0 or newer.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let one_active_per_package = IndexModel::builder()
            .keys(doc! { "userId": 1, "packageId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_package_active_unique".to_string())
                    .partial_filter_expression(doc! { "status": { "$in": active_statuses() } })
                    .build(),
            )
            .build();
        let by_user = IndexModel::builder()
            .keys(doc! { "userId": 1, "createdAt": -1 })
            .options(IndexOptions::builder().name("user_created_at".to_string()).build())
            .build();
        self.collection.create_indexes([one_active_per_package, by_user], None).await?;
        info!("Booking indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    #[tracing::instrument(skip(self, booking), fields(user_id = %booking.user_id, package_id = %booking.package_id))]
    async fn insert_active(&self, mut booking: Booking) -> RepositoryResult<Booking> {
        booking.id = Some(ObjectId::new());
        let now = timestamp();
        booking.created_at = Some(now.clone());
        booking.updated_at = Some(now);
        match self.collection.insert_one(&booking, None).await {
            Ok(_) => {
                info!("Booking created successfully");
                Ok(booking)
            }
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists(_) => {
                    warn!("Active booking already exists for user and package");
                    Err(RepositoryError::already_exists("You have already booked this package"))
                }
                other => {
                    error!("Failed to create booking: {}", other);
                    Err(other)
                }
            },
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Booking>> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch booking by ID: {}", e)))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Booking>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self
            .collection
            .find(doc! { "userId": user_id }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list bookings: {}", e)))?;
        let bookings: Vec<Booking> = cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::serialization(format!("Failed to read bookings: {}", e)))?;
        info!("Fetched {} bookings", bookings.len());
        Ok(bookings)
    }

    #[tracing::instrument(skip(self), fields(id = %id, expected = %expected, next = %next))]
    async fn compare_and_set_status(
        &self,
        id: &ObjectId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> RepositoryResult<Option<Booking>> {
        let filter = doc! { "_id": id, "status": expected.as_str() };
        let update = doc! { "$set": { "status": next.as_str(), "updatedAt": timestamp() } };
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        let updated = self.collection.find_one_and_update(filter, update, options).await?;
        if updated.is_none() {
            warn!("Booking status changed concurrently or booking removed");
        }
        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(package_id = %package_id))]
    async fn cancel_active_for_package(&self, package_id: &ObjectId) -> RepositoryResult<u64> {
        let filter = doc! { "packageId": package_id, "status": { "$in": active_statuses() } };
        let update = doc! {
            "$set": { "status": BookingStatus::Cancelled.as_str(), "updatedAt": timestamp() }
        };
        let result = self
            .collection
            .update_many(filter, update, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to cancel bookings: {}", e)))?;
        info!("Cancelled {} active bookings", result.modified_count);
        Ok(result.modified_count)
    }
}
