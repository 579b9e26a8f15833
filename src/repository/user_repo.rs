use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};
use tracing::{error, info};

use crate::model::timestamp;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Assigns id and timestamps; a taken email is `AlreadyExists`.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoUserRepository { collection: db.collection::<User>(collection_name) }
    }

    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).name("email_unique".to_string()).build())
            .build();
        self.collection.create_index(index, None).await?;
        info!("User indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = timestamp();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(&user, None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                let err = RepositoryError::from(e);
                error!("Failed to insert user: {}", err);
                Err(err)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))
    }
}
