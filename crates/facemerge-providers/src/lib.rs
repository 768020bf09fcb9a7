//! Clients for the external face-analysis providers.
//!
//! This crate provides:
//! - `FaceppClient`: Face++ `detect` (head pose, eye status, emotion)
//! - `AzureFaceClient`: Azure Face `detect` (emotion, head pose)
//! - Immutable configuration objects loaded once from the environment
//!
//! Both clients return the attributes of the first detected face only, or
//! `None` when the image contains no face.

pub mod azure;
pub mod config;
pub mod error;
pub mod facepp;
mod types;

pub use azure::AzureFaceClient;
pub use config::{AzureConfig, ConfigError, FaceppConfig, ProvidersConfig};
pub use error::{ProviderError, ProviderResult};
pub use facepp::FaceppClient;
