//! Cache tag derivation.
//!
//! Tags are opaque keys handed to [`TagCache`](super::cache::TagCache) for
//! selective invalidation. Ids are embedded verbatim between a fixed prefix and
//! suffix, so distinct ids always yield distinct tags.

/// Resource families that own cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheResource {
    Users,
    JobInfos,
}

impl CacheResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheResource::Users => "users",
            CacheResource::JobInfos => "jobInfos",
        }
    }
}

pub fn global_tag(resource: CacheResource) -> String {
    format!("global:{}", resource.as_str())
}

pub fn id_tag(resource: CacheResource, id: &str) -> String {
    format!("id:{}-{}", id, resource.as_str())
}

pub fn user_tag(resource: CacheResource, user_id: &str) -> String {
    format!("user:{}-{}", user_id, resource.as_str())
}

pub fn user_global_tag() -> String {
    global_tag(CacheResource::Users)
}

pub fn user_id_tag(id: &str) -> String {
    id_tag(CacheResource::Users, id)
}

pub fn job_info_global_tag() -> String {
    global_tag(CacheResource::JobInfos)
}

pub fn job_info_id_tag(id: &str) -> String {
    id_tag(CacheResource::JobInfos, id)
}

pub fn job_info_user_tag(user_id: &str) -> String {
    user_tag(CacheResource::JobInfos, user_id)
}
