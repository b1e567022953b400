use std::sync::Arc;

use crate::config::Config;
use crate::database::{JobInfoRepository, UserRepository};
use crate::services::identity::SessionVerifier;
use crate::services::{JobInfoService, UserService};
use crate::utils::TagCache;

/// Shared application state, handed to handlers through `web::Data`.
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionVerifier>,
    pub cache: Arc<TagCache>,
    pub users: UserService,
    pub job_infos: JobInfoService,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        job_infos: Arc<dyn JobInfoRepository>,
    ) -> Self {
        let cache = Arc::new(TagCache::new());
        let sessions = Arc::new(SessionVerifier::new(&config.auth));

        Self {
            users: UserService::new(users, cache.clone()),
            job_infos: JobInfoService::new(job_infos, cache.clone()),
            sessions,
            cache,
            config,
        }
    }
}
