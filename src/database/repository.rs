//! Persistence ports and their MongoDB implementations.
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;

use super::{MongoDB, JOB_INFOS_COLLECTION, USERS_COLLECTION};
use crate::models::{JobInfo, User};
use crate::utils::AppError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user, or overwrite name/email/image_url of the row with the
    /// same `user_id`. `created_at` is only written on insert.
    async fn upsert(&self, user: &User) -> Result<(), AppError>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait JobInfoRepository: Send + Sync {
    async fn insert(&self, job_info: &JobInfo) -> Result<(), AppError>;

    /// All job infos owned by `user_id`, most recently updated first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobInfo>, AppError>;
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn upsert(&self, user: &User) -> Result<(), AppError> {
        let collection = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let filter = doc! { "user_id": &user.user_id };

        let update = doc! {
            "$set": {
                "name": &user.name,
                "email": &user.email,
                "image_url": user.image_url.as_deref(),
                "updated_at": user.updated_at,
            },
            "$setOnInsert": {
                "user_id": &user.user_id,
                "created_at": user.created_at,
            }
        };

        let options = UpdateOptions::builder().upsert(true).build();

        collection
            .update_one(filter, update)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to upsert user: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let collection = self.collection::<User>(USERS_COLLECTION);

        let user = collection.find_one(doc! { "user_id": user_id }).await?;

        Ok(user)
    }
}

#[async_trait]
impl JobInfoRepository for MongoDB {
    async fn insert(&self, job_info: &JobInfo) -> Result<(), AppError> {
        let collection = self.collection::<JobInfo>(JOB_INFOS_COLLECTION);

        collection
            .insert_one(job_info)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create job info: {}", e)))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobInfo>, AppError> {
        let collection = self.collection::<JobInfo>(JOB_INFOS_COLLECTION);

        let mut cursor = collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "updated_at": -1 })
            .await?;

        let mut job_infos = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(job_info) => job_infos.push(job_info),
                Err(e) => log::error!("❌ Failed to decode job info for {}: {}", user_id, e),
            }
        }

        Ok(job_infos)
    }
}
