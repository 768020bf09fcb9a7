//! Services backing the request handlers.

pub mod detection;

pub use detection::{DetectionProfile, DetectionService, ResponseShape};
