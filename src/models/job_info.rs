use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    /// Human readable label shown next to a job description.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A job description the user prepares interviews against (collection: job_infos)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct JobInfo {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
    pub experience_level: ExperienceLevel,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInfoRequest {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
    pub experience_level: ExperienceLevel,
}

/// Dashboard card for a job description
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct JobInfoListItem {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub description: String,
    pub experience_level: ExperienceLevel,
    pub experience_level_label: String,
    pub updated_at: i64,
}

impl From<JobInfo> for JobInfoListItem {
    fn from(info: JobInfo) -> Self {
        Self {
            experience_level_label: info.experience_level.label().to_string(),
            id: info.id,
            name: info.name,
            title: info.title,
            description: info.description,
            experience_level: info.experience_level,
            updated_at: info.updated_at,
        }
    }
}
