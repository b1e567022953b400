// Utility functions
pub mod cache;
pub mod cache_tags;
pub mod error;

pub use cache::*;
pub use error::*;
