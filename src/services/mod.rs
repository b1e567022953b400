pub mod identity;
pub mod job_info_service;
pub mod permissions;
pub mod user_service;

pub use job_info_service::*;
pub use user_service::*;
