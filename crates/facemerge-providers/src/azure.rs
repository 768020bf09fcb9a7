//! Azure Face detect client.

use facemerge_models::{AttributeBundle, FaceAttribute};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::AzureConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::types::{ensure_requested, AzureFace};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the Azure Face `detect` operation.
pub struct AzureFaceClient {
    http: Client,
    config: AzureConfig,
}

impl AzureFaceClient {
    pub const NAME: &'static str = "Azure";

    /// Create a new Azure Face client.
    pub fn new(config: AzureConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Detect faces and return the requested attributes of the first one.
    ///
    /// Attributes Azure cannot report are not requested. Returns `Ok(None)`
    /// when Azure finds no face in the image.
    pub async fn detect(
        &self,
        image: &[u8],
        attributes: &[FaceAttribute],
    ) -> ProviderResult<Option<AttributeBundle>> {
        let supported: Vec<FaceAttribute> = attributes
            .iter()
            .copied()
            .filter(|a| a.azure_name().is_some())
            .collect();
        if supported.len() < attributes.len() {
            debug!("Azure does not report some requested attributes, skipping them");
        }

        let mut request = self
            .http
            .post(self.config.endpoint.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());

        if !supported.is_empty() {
            let names = supported
                .iter()
                .filter_map(FaceAttribute::azure_name)
                .collect::<Vec<_>>()
                .join(",");
            request = request.query(&[("returnFaceAttributes", names)]);
        }

        debug!("Sending {} byte image to Azure", image.len());

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        info!(provider = Self::NAME, status = %status, "Azure responded");
        debug!(provider = Self::NAME, body = %body, "Azure response body");

        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: Self::NAME,
                status,
                body,
            });
        }

        let faces: Vec<AzureFace> =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(Self::NAME, e))?;

        let Some(face) = faces.into_iter().next() else {
            return Ok(None);
        };

        let bundle = match face.face_attributes {
            Some(attrs) => AttributeBundle::from(attrs),
            None if supported.is_empty() => AttributeBundle::default(),
            None => {
                return Err(ProviderError::invalid_response(
                    Self::NAME,
                    "face has no 'faceAttributes' object",
                ))
            }
        };
        ensure_requested(Self::NAME, &bundle, &supported)?;

        Ok(Some(bundle))
    }
}
