pub mod job_info;
pub mod user;

pub use job_info::*;
pub use user::*;
