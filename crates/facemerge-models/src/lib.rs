//! Shared data models for the FaceMerge service.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion score mappings and their dominant label
//! - Per-face attribute bundles returned by the providers
//! - The consensus merge across two providers
//! - The canonical detection response and its text summary

pub mod attributes;
pub mod consensus;
pub mod emotion;
pub mod report;

// Re-export common types
pub use attributes::{
    AttributeBundle, EyeState, EyeStatus, FaceAttribute, FaceAttributeParseError, HeadPose,
};
pub use consensus::{merge, ConsensusResult};
pub use emotion::EmotionScores;
pub use report::{DetectionReport, SummaryResponse};
