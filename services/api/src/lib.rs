//! Tubely API service
//!
//! HTTP surface for uploading videos and thumbnails. Videos are probed,
//! remuxed for faststart playback and pushed to the object store; thumbnails
//! are written to the local assets directory and served back publicly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod staging;
pub mod state;
pub mod thumbnails;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
