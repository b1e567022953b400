use std::sync::Arc;

use async_trait::async_trait;

use crate::database::UserRepository;
use crate::models::{SyncUserRequest, User};
use crate::onboarding::SyncAction;
use crate::utils::cache_tags::{user_global_tag, user_id_tag};
use crate::utils::{AppError, TagCache};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cache: Arc<TagCache>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<TagCache>) -> Self {
        Self { users, cache }
    }

    /// Upserts the identity into `users`, then revalidates the per-user and
    /// global user tags. Invalidation only happens after a successful write.
    pub async fn sync_user(&self, request: &SyncUserRequest) -> Result<(), AppError> {
        if request.id.trim().is_empty() {
            return Err(AppError::InvalidRequest("User id is required".to_string()));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let user = User {
            user_id: request.id.clone(),
            name: request.name.clone(),
            email: request.email.clone(),
            image_url: request.image_url.clone(),
            created_at: now,
            updated_at: now,
        };

        self.users.upsert(&user).await?;
        log::info!("✅ User synced: {}", user.user_id);

        self.revalidate(&user.user_id);
        Ok(())
    }

    pub fn revalidate(&self, user_id: &str) {
        self.cache.revalidate_tag(&user_global_tag());
        self.cache.revalidate_tag(&user_id_tag(user_id));
    }

    /// Cached lookup, tagged with the user's id tag.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let key = format!("users:by-id:{}", user_id);
        let tags = [user_id_tag(user_id)];

        self.cache
            .get_or_load(&key, &tags, || self.users.find_by_id(user_id))
            .await
    }
}

#[async_trait]
impl SyncAction for UserService {
    async fn sync_user(&self, request: &SyncUserRequest) -> Result<(), AppError> {
        UserService::sync_user(self, request).await
    }
}
