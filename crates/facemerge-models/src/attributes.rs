//! Per-face attributes reported by the face providers.
//!
//! Only the first detected face of an image is ever kept; the providers
//! return faces in their own order and later entries are discarded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emotion::EmotionScores;

/// Attribute a provider can be asked to return for a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceAttribute {
    HeadPose,
    EyeStatus,
    Emotion,
}

impl FaceAttribute {
    /// All supported attributes.
    pub const ALL: &'static [FaceAttribute] = &[
        FaceAttribute::HeadPose,
        FaceAttribute::EyeStatus,
        FaceAttribute::Emotion,
    ];

    /// Name used in the Face++ `return_attributes` form field.
    pub fn facepp_name(&self) -> &'static str {
        match self {
            FaceAttribute::HeadPose => "headpose",
            FaceAttribute::EyeStatus => "eyestatus",
            FaceAttribute::Emotion => "emotion",
        }
    }

    /// Name used in the Azure `returnFaceAttributes` query parameter.
    ///
    /// Azure has no eye status attribute.
    pub fn azure_name(&self) -> Option<&'static str> {
        match self {
            FaceAttribute::HeadPose => Some("headPose"),
            FaceAttribute::EyeStatus => None,
            FaceAttribute::Emotion => Some("emotion"),
        }
    }
}

impl fmt::Display for FaceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.facepp_name())
    }
}

impl FromStr for FaceAttribute {
    type Err = FaceAttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "headpose" | "head_pose" => Ok(FaceAttribute::HeadPose),
            "eyestatus" | "eye_status" => Ok(FaceAttribute::EyeStatus),
            "emotion" => Ok(FaceAttribute::Emotion),
            _ => Err(FaceAttributeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown face attribute: {0}")]
pub struct FaceAttributeParseError(String);

/// Head orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    #[serde(alias = "pitch")]
    pub pitch_angle: f64,
    #[serde(alias = "roll")]
    pub roll_angle: f64,
    #[serde(alias = "yaw")]
    pub yaw_angle: f64,
}

impl fmt::Display for HeadPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pitch {:.2}, roll {:.2}, yaw {:.2}",
            self.pitch_angle, self.roll_angle, self.yaw_angle
        )
    }
}

/// Confidences for the possible states of one eye.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeState {
    #[serde(default)]
    pub no_glass_eye_open: f64,
    #[serde(default)]
    pub no_glass_eye_close: f64,
    #[serde(default)]
    pub normal_glass_eye_open: f64,
    #[serde(default)]
    pub normal_glass_eye_close: f64,
    #[serde(default)]
    pub dark_glasses: f64,
    #[serde(default)]
    pub occlusion: f64,
}

impl EyeState {
    /// Name of the state with the highest confidence.
    pub fn most_likely(&self) -> &'static str {
        let states = [
            ("no_glass_eye_open", self.no_glass_eye_open),
            ("no_glass_eye_close", self.no_glass_eye_close),
            ("normal_glass_eye_open", self.normal_glass_eye_open),
            ("normal_glass_eye_close", self.normal_glass_eye_close),
            ("dark_glasses", self.dark_glasses),
            ("occlusion", self.occlusion),
        ];

        let mut best = states[0];
        for state in &states[1..] {
            if state.1 > best.1 {
                best = *state;
            }
        }
        best.0
    }

    /// Whether the eye is more likely open than closed.
    pub fn is_open(&self) -> bool {
        self.no_glass_eye_open + self.normal_glass_eye_open
            > self.no_glass_eye_close + self.normal_glass_eye_close
    }
}

/// Eye status for both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeStatus {
    pub left_eye_status: EyeState,
    pub right_eye_status: EyeState,
}

impl fmt::Display for EyeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left {}, right {}",
            self.left_eye_status.most_likely(),
            self.right_eye_status.most_likely()
        )
    }
}

/// Attributes of the first detected face.
///
/// Every field is optional: a provider only fills what it was asked for
/// and what it supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_pose: Option<HeadPose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_status: Option<EyeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionScores>,
}

impl AttributeBundle {
    /// Whether the bundle carries the given attribute.
    pub fn has(&self, attribute: FaceAttribute) -> bool {
        match attribute {
            FaceAttribute::HeadPose => self.head_pose.is_some(),
            FaceAttribute::EyeStatus => self.eye_status.is_some(),
            FaceAttribute::Emotion => self.emotion.is_some(),
        }
    }

    /// Emotion scores, if any were reported.
    pub fn emotion_scores(&self) -> Option<&EmotionScores> {
        self.emotion.as_ref().filter(|scores| !scores.is_empty())
    }
}
