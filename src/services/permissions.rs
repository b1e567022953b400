use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::services::identity::Session;

/// Plan features that gate usage limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Permission {
    #[serde(rename = "unlimited_resume_analysis")]
    UnlimitedResumeAnalysis,
    #[serde(rename = "unlimited_interviews")]
    UnlimitedInterviews,
    #[serde(rename = "unlimited_questions")]
    UnlimitedQuestions,
    #[serde(rename = "1_interview")]
    OneInterview,
    #[serde(rename = "5_questions")]
    FiveQuestions,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::UnlimitedResumeAnalysis,
        Permission::UnlimitedInterviews,
        Permission::UnlimitedQuestions,
        Permission::OneInterview,
        Permission::FiveQuestions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UnlimitedResumeAnalysis => "unlimited_resume_analysis",
            Permission::UnlimitedInterviews => "unlimited_interviews",
            Permission::UnlimitedQuestions => "unlimited_questions",
            Permission::OneInterview => "1_interview",
            Permission::FiveQuestions => "5_questions",
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the caller's plan includes `permission`.
///
/// Development builds always pass so plan limits never get in the way locally.
/// Without a session the answer is `false`.
pub fn has_permission(
    environment: Environment,
    session: Option<&Session>,
    permission: Permission,
) -> bool {
    if environment.is_development() {
        return true;
    }

    session
        .map(|s| s.has_feature(permission.as_str()))
        .unwrap_or(false)
}
