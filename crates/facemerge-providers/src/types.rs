//! Provider wire types.

use facemerge_models::{AttributeBundle, EmotionScores, EyeStatus, FaceAttribute, HeadPose};
use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Face++ `detect` response.
#[derive(Debug, Deserialize)]
pub(crate) struct FaceppDetectResponse {
    #[serde(default)]
    pub faces: Vec<FaceppFace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FaceppFace {
    pub attributes: Option<FaceppAttributes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FaceppAttributes {
    pub headpose: Option<HeadPose>,
    pub eyestatus: Option<EyeStatus>,
    pub emotion: Option<EmotionScores>,
}

impl From<FaceppAttributes> for AttributeBundle {
    fn from(attributes: FaceppAttributes) -> Self {
        Self {
            head_pose: attributes.headpose,
            eye_status: attributes.eyestatus,
            emotion: attributes.emotion,
        }
    }
}

/// One face of an Azure `detect` response (the body is a bare array).
#[derive(Debug, Deserialize)]
pub(crate) struct AzureFace {
    #[serde(rename = "faceAttributes")]
    pub face_attributes: Option<AzureFaceAttributes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AzureFaceAttributes {
    #[serde(rename = "headPose")]
    pub head_pose: Option<HeadPose>,
    pub emotion: Option<EmotionScores>,
}

impl From<AzureFaceAttributes> for AttributeBundle {
    fn from(attributes: AzureFaceAttributes) -> Self {
        Self {
            head_pose: attributes.head_pose,
            eye_status: None,
            emotion: attributes.emotion,
        }
    }
}

/// Fail when a requested attribute is missing from the face.
pub(crate) fn ensure_requested<'a>(
    provider: &'static str,
    bundle: &AttributeBundle,
    requested: impl IntoIterator<Item = &'a FaceAttribute>,
) -> ProviderResult<()> {
    match requested.into_iter().find(|a| !bundle.has(**a)) {
        Some(missing) => Err(ProviderError::invalid_response(
            provider,
            format!("face has no '{}' attribute", missing),
        )),
        None => Ok(()),
    }
}
