//! Backend for Landr, an interview preparation app.
//!
//! Users sign in with an external identity provider. On first sign-in the
//! onboarding flow copies the identity into the `users` collection, after which
//! the dashboard serves the user's job descriptions. Routes under `/app`,
//! `/onboarding` and `/forum` are gated by [`middleware::RouteGuard`]; reads are
//! cached in a [`utils::TagCache`] and invalidated by tag after writes.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod onboarding;
pub mod services;
pub mod state;
pub mod utils;
