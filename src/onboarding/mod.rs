pub mod client;
pub mod controller;

pub use client::HttpSyncAction;
pub use controller::*;
