//! Backend integration: HTTP client, wire models, auth session

pub mod auth;
pub mod client;
pub mod models;

pub use auth::AuthSession;
pub use client::{ApiClient, SignInResponse};
pub use models::{LocationRecord, PlayerProfile};
