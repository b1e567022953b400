use std::sync::Arc;

use uuid::Uuid;

use crate::database::JobInfoRepository;
use crate::models::{CreateJobInfoRequest, JobInfo, JobInfoListItem};
use crate::utils::cache_tags::{job_info_global_tag, job_info_id_tag, job_info_user_tag};
use crate::utils::{AppError, TagCache};

#[derive(Clone)]
pub struct JobInfoService {
    job_infos: Arc<dyn JobInfoRepository>,
    cache: Arc<TagCache>,
}

impl JobInfoService {
    pub fn new(job_infos: Arc<dyn JobInfoRepository>, cache: Arc<TagCache>) -> Self {
        Self { job_infos, cache }
    }

    /// Dashboard listing, most recently updated first. Cached per user.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobInfoListItem>, AppError> {
        let key = format!("job_infos:by-user:{}", user_id);
        let tags = [job_info_user_tag(user_id)];

        self.cache
            .get_or_load(&key, &tags, || async {
                let job_infos = self.job_infos.list_for_user(user_id).await?;
                Ok::<_, AppError>(job_infos.into_iter().map(JobInfoListItem::from).collect::<Vec<_>>())
            })
            .await
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: CreateJobInfoRequest,
    ) -> Result<JobInfo, AppError> {
        let name = request.name.trim();
        let description = request.description.trim();

        if name.is_empty() {
            return Err(AppError::InvalidRequest("Name is required".to_string()));
        }
        if description.is_empty() {
            return Err(AppError::InvalidRequest("Description is required".to_string()));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let job_info = JobInfo {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            title: request
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            description: description.to_string(),
            experience_level: request.experience_level,
            created_at: now,
            updated_at: now,
        };

        self.job_infos.insert(&job_info).await?;
        log::info!("✅ Job info {} created for user {}", job_info.id, user_id);

        self.revalidate(&job_info);
        Ok(job_info)
    }

    fn revalidate(&self, job_info: &JobInfo) {
        self.cache.revalidate_tag(&job_info_global_tag());
        self.cache.revalidate_tag(&job_info_user_tag(&job_info.user_id));
        self.cache.revalidate_tag(&job_info_id_tag(&job_info.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;
    use crate::models::ExperienceLevel;

    fn service() -> JobInfoService {
        JobInfoService::new(Arc::new(InMemoryStore::new()), Arc::new(TagCache::new()))
    }

    fn request(name: &str) -> CreateJobInfoRequest {
        CreateJobInfoRequest {
            name: name.to_string(),
            title: Some("  ".to_string()),
            description: "Rust backend, actix-web, MongoDB".to_string(),
            experience_level: ExperienceLevel::MidLevel,
        }
    }

    #[tokio::test]
    async fn test_created_job_info_shows_up_in_cached_listing() {
        let service = service();
        assert!(service.list_for_user("user_1").await.unwrap().is_empty());

        let created = service.create("user_1", request("Backend role")).await.unwrap();
        assert_eq!(created.title, None);

        let listed = service.list_for_user("user_1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].experience_level_label, "Mid-Level");
    }

    #[tokio::test]
    async fn test_listing_is_scoped_and_newest_first() {
        let service = service();
        let first = service.create("user_1", request("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = service.create("user_1", request("Second")).await.unwrap();
        service.create("user_2", request("Other")).await.unwrap();

        let listed = service.list_for_user("user_1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|j| j.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let service = service();
        let result = service.create("user_1", request("   ")).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        let mut no_description = request("Role");
        no_description.description = String::new();
        assert!(service.create("user_1", no_description).await.is_err());
    }
}
