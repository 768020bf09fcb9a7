//! Axum HTTP API server.
//!
//! This crate provides:
//! - Image upload routes that query Face++ and Azure Face
//! - The consensus emotion across both providers
//! - The landing page and static assets
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, AppConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{DetectionProfile, DetectionService, ResponseShape};
pub use state::AppState;
