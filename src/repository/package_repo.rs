use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};
use tracing::{error, info};

use crate::model::package::{Package, PackageChanges};
use crate::model::timestamp;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn insert(&self, package: Package) -> RepositoryResult<Package>;
    /// Newest first.
    async fn list(&self) -> RepositoryResult<Vec<Package>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Package>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Package>>;
    /// Writes only the present fields in one atomic update; `None` when no package has `id`.
    async fn apply_changes(&self, id: &ObjectId, changes: &PackageChanges) -> RepositoryResult<Option<Package>>;
    /// Returns whether a document was removed.
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn count(&self) -> RepositoryResult<u64>;
}

pub struct MongoPackageRepository {
    collection: Collection<Package>,
}

impl MongoPackageRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoPackageRepository { collection: db.collection::<Package>(collection_name) }
    }
}

fn set_document(changes: &PackageChanges, updated_at: String) -> Document {
    let mut set = doc! { "updatedAt": updated_at };
    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    if let Some(location) = &changes.location {
        set.insert("location", location.as_str());
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(description) = &changes.description {
        set.insert("description", description.as_str());
    }
    if let Some(image) = &changes.image {
        set.insert("image", image.as_str());
    }
    set
}

#[async_trait]
impl PackageRepository for MongoPackageRepository {
    #[tracing::instrument(skip(self, package), fields(title = %package.title))]
    async fn insert(&self, mut package: Package) -> RepositoryResult<Package> {
        package.id = Some(ObjectId::new());
        let now = timestamp();
        package.created_at = Some(now.clone());
        package.updated_at = Some(now);
        match self.collection.insert_one(&package, None).await {
            Ok(_) => {
                info!("Package created successfully");
                Ok(package)
            }
            Err(e) => {
                error!("Failed to create package: {}", e);
                Err(RepositoryError::database(format!("Failed to create package: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<Package>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list packages: {}", e)))?;
        let packages: Vec<Package> = cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::serialization(format!("Failed to read packages: {}", e)))?;
        info!("Fetched {} packages", packages.len());
        Ok(packages)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Package>> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch package by ID: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Package>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch packages: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::serialization(format!("Failed to read packages: {}", e)))
    }

    #[tracing::instrument(skip(self, changes), fields(id = %id))]
    async fn apply_changes(&self, id: &ObjectId, changes: &PackageChanges) -> RepositoryResult<Option<Package>> {
        let update = doc! { "$set": set_document(changes, timestamp()) };
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update package: {}", e)))?;
        match &updated {
            Some(_) => info!("Package updated successfully"),
            None => error!("No package found to update"),
        }
        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete package: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        self.collection
            .count_documents(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count packages: {}", e)))
    }
}
