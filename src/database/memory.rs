//! In-memory repositories for tests.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{JobInfoRepository, UserRepository};
use crate::models::{JobInfo, User};
use crate::utils::AppError;

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<String, User>>,
    job_infos: Mutex<Vec<JobInfo>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn upsert(&self, user: &User) -> Result<(), AppError> {
        self.check_writable()?;

        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.user_id) {
            Some(existing) => {
                existing.name = user.name.clone();
                existing.email = user.email.clone();
                existing.image_url = user.image_url.clone();
                existing.updated_at = user.updated_at;
            }
            None => {
                users.insert(user.user_id.clone(), user.clone());
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }
}

#[async_trait]
impl JobInfoRepository for InMemoryStore {
    async fn insert(&self, job_info: &JobInfo) -> Result<(), AppError> {
        self.check_writable()?;
        self.job_infos.lock().unwrap().push(job_info.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobInfo>, AppError> {
        let mut found: Vec<JobInfo> = self
            .job_infos
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }
}
