use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::model::package::{NewPackage, Package, PackageChanges};
use crate::model::user::AuthenticatedUser;
use crate::repository::booking_repo::BookingRepository;
use crate::repository::package_repo::PackageRepository;
use crate::util::error::ServiceError;

pub const PACKAGE_NOT_FOUND: &str = "Package not found";

#[async_trait]
pub trait PackageService: Send + Sync {
    async fn list_packages(&self) -> Result<Vec<Package>, ServiceError>;
    async fn get_package(&self, id: &ObjectId) -> Result<Package, ServiceError>;
    async fn create_package(&self, fields: NewPackage, acting: &AuthenticatedUser) -> Result<Package, ServiceError>;
    async fn update_package(
        &self,
        id: &ObjectId,
        changes: PackageChanges,
        acting: &AuthenticatedUser,
    ) -> Result<Package, ServiceError>;
    /// Removes the package and cancels every active booking on it.
    async fn delete_package(&self, id: &ObjectId, acting: &AuthenticatedUser) -> Result<(), ServiceError>;
}

pub struct PackageServiceImpl {
    pub package_repo: Arc<dyn PackageRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
}

fn check_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ServiceError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ServiceError::InvalidInput("Price must be a non-negative number".to_string()));
    }
    Ok(())
}

fn check_new_package(fields: &NewPackage) -> Result<(), ServiceError> {
    check_text("Title", &fields.title)?;
    check_text("Location", &fields.location)?;
    check_text("Description", &fields.description)?;
    check_price(fields.price)
}

fn check_changes(changes: &PackageChanges) -> Result<(), ServiceError> {
    if let Some(title) = &changes.title {
        check_text("Title", title)?;
    }
    if let Some(location) = &changes.location {
        check_text("Location", location)?;
    }
    if let Some(description) = &changes.description {
        check_text("Description", description)?;
    }
    if let Some(price) = changes.price {
        check_price(price)?;
    }
    Ok(())
}

impl PackageServiceImpl {
    pub fn new(package_repo: Arc<dyn PackageRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { package_repo, booking_repo }
    }
}

#[async_trait]
impl PackageService for PackageServiceImpl {
    #[instrument(skip(self))]
    async fn list_packages(&self) -> Result<Vec<Package>, ServiceError> {
        let res = self.package_repo.list().await;
        match &res {
            Ok(packages) => info!("Listed {} packages", packages.len()),
            Err(e) => error!("Failed to list packages: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_package(&self, id: &ObjectId) -> Result<Package, ServiceError> {
        self.package_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PACKAGE_NOT_FOUND.to_string()))
    }

    #[instrument(skip(self, fields, acting), fields(title = %fields.title, admin = %acting.id))]
    async fn create_package(&self, fields: NewPackage, acting: &AuthenticatedUser) -> Result<Package, ServiceError> {
        acting.require_admin()?;
        check_new_package(&fields)?;
        let res = self.package_repo.insert(fields.into_package(acting.id)).await;
        match &res {
            Ok(_) => info!("Package created successfully"),
            Err(e) => error!("Failed to create package: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, changes, acting), fields(id = %id, admin = %acting.id))]
    async fn update_package(
        &self,
        id: &ObjectId,
        changes: PackageChanges,
        acting: &AuthenticatedUser,
    ) -> Result<Package, ServiceError> {
        acting.require_admin()?;
        check_changes(&changes)?;
        if changes.is_empty() {
            info!("Empty package update, nothing written");
            return self.get_package(id).await;
        }
        let res = self.package_repo.apply_changes(id, &changes).await;
        match &res {
            Ok(Some(_)) => info!("Package updated successfully"),
            Ok(None) => warn!("Package to update not found"),
            Err(e) => error!("Failed to update package: {e}"),
        }
        res?.ok_or_else(|| ServiceError::NotFound(PACKAGE_NOT_FOUND.to_string()))
    }

    #[instrument(skip(self, acting), fields(id = %id, admin = %acting.id))]
    async fn delete_package(&self, id: &ObjectId, acting: &AuthenticatedUser) -> Result<(), ServiceError> {
        acting.require_admin()?;
        // Delete first so no new booking can resolve the package, then release the old ones.
        if !self.package_repo.delete(id).await? {
            warn!("Package to delete not found");
            return Err(ServiceError::NotFound(PACKAGE_NOT_FOUND.to_string()));
        }
        let cancelled = self.booking_repo.cancel_active_for_package(id).await;
        match &cancelled {
            Ok(count) => info!("Package deleted, {} active bookings cancelled", count),
            Err(e) => error!("Package deleted but its bookings could not be cancelled: {e}"),
        }
        cancelled.map(|_| ()).map_err(ServiceError::from)
    }
}
