//! Detection orchestration.
//!
//! One request runs through [`DetectionService::detect`] with the profile of
//! the route it arrived on. Face++ is always called first; Azure follows
//! when the profile asks for it and Azure is configured. The calls are
//! sequential.

use std::time::Instant;

use facemerge_models::{AttributeBundle, DetectionReport, FaceAttribute};
use facemerge_providers::{
    AzureFaceClient, FaceppClient, ProviderError, ProviderResult, ProvidersConfig,
};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Attributes requested from Azure.
const AZURE_ATTRIBUTES: &[FaceAttribute] = &[FaceAttribute::Emotion];

/// How a detection result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The JSON `DetectionReport`
    Structured,
    /// `{"result": "<text>"}`
    Summary,
}

/// Which providers a route queries, for what, and how it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionProfile {
    pub name: &'static str,
    pub facepp_attributes: &'static [FaceAttribute],
    pub query_azure: bool,
    pub shape: ResponseShape,
}

impl DetectionProfile {
    /// Face++ only, every attribute.
    pub const ATTRIBUTES: Self = Self {
        name: "attributes",
        facepp_attributes: FaceAttribute::ALL,
        query_azure: false,
        shape: ResponseShape::Structured,
    };

    /// Emotions from both providers plus their consensus.
    pub const CONSENSUS: Self = Self {
        name: "consensus",
        facepp_attributes: &[FaceAttribute::Emotion],
        query_azure: true,
        shape: ResponseShape::Structured,
    };

    /// Everything, rendered as readable text.
    pub const SUMMARY: Self = Self {
        name: "summary",
        facepp_attributes: FaceAttribute::ALL,
        query_azure: true,
        shape: ResponseShape::Summary,
    };
}

/// Runs detection requests against the configured providers.
pub struct DetectionService {
    facepp: FaceppClient,
    azure: Option<AzureFaceClient>,
}

impl DetectionService {
    /// Build the provider clients from configuration.
    pub fn new(config: &ProvidersConfig) -> ProviderResult<Self> {
        let facepp = FaceppClient::new(config.facepp.clone())?;
        let azure = config
            .azure
            .clone()
            .map(AzureFaceClient::new)
            .transpose()?;

        Ok(Self { facepp, azure })
    }

    pub fn azure_enabled(&self) -> bool {
        self.azure.is_some()
    }

    /// Run one detection request.
    pub async fn detect(
        &self,
        profile: &DetectionProfile,
        image: &[u8],
    ) -> ApiResult<DetectionReport> {
        let result = self.run(profile, image).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(ApiError::NoFaceDetected(_)) => "no_face",
            Err(ApiError::ProviderRequest(_)) => "provider_error",
            Err(_) => "internal_error",
        };
        metrics::record_detection(profile.name, outcome);

        result
    }

    async fn run(&self, profile: &DetectionProfile, image: &[u8]) -> ApiResult<DetectionReport> {
        let facepp = timed(
            FaceppClient::NAME,
            self.facepp.detect(image, profile.facepp_attributes),
        )
        .await?;

        let mut queried = 1;
        let azure = match (&self.azure, profile.query_azure) {
            (Some(client), true) => {
                queried += 1;
                timed(AzureFaceClient::NAME, client.detect(image, AZURE_ATTRIBUTES)).await?
            }
            (None, true) => {
                debug!("Azure not configured, profile '{}' runs on Face++ only", profile.name);
                None
            }
            _ => None,
        };

        if facepp.is_none() && azure.is_none() {
            return Err(ApiError::no_face(if queried > 1 {
                "No face detected by either provider"
            } else {
                "No face detected"
            }));
        }

        let report = DetectionReport::assemble(facepp, azure);
        if report.has_consensus() {
            metrics::record_consensus(report.dominant_consensus_emotion.as_deref());
            info!(
                dominant = report.dominant_consensus_emotion.as_deref().unwrap_or("none"),
                "Consensus emotion computed"
            );
        }

        Ok(report)
    }
}

/// Await a provider call, recording its duration and outcome.
async fn timed<F>(provider: &'static str, call: F) -> ProviderResult<Option<AttributeBundle>>
where
    F: std::future::Future<Output = ProviderResult<Option<AttributeBundle>>>,
{
    let start = Instant::now();
    let result = call.await;

    let outcome = match &result {
        Ok(Some(_)) => "face",
        Ok(None) => "no_face",
        Err(e) if e.is_request_error() => "request_error",
        Err(ProviderError::Json { .. }) | Err(ProviderError::InvalidResponse { .. }) => {
            "invalid_response"
        }
        Err(_) => "error",
    };
    metrics::record_provider_call(provider, outcome, start.elapsed().as_secs_f64());

    result
}
