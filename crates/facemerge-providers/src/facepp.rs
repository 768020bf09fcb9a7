//! Face++ detect client.

use facemerge_models::{AttributeBundle, FaceAttribute};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::FaceppConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::types::{ensure_requested, FaceppDetectResponse};

/// Client for the Face++ `detect` operation.
pub struct FaceppClient {
    http: Client,
    config: FaceppConfig,
}

impl FaceppClient {
    pub const NAME: &'static str = "Face++";

    /// Create a new Face++ client.
    pub fn new(config: FaceppConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &FaceppConfig {
        &self.config
    }

    /// Detect faces and return the requested attributes of the first one.
    ///
    /// Returns `Ok(None)` when Face++ finds no face in the image.
    pub async fn detect(
        &self,
        image: &[u8],
        attributes: &[FaceAttribute],
    ) -> ProviderResult<Option<AttributeBundle>> {
        let return_attributes = attributes
            .iter()
            .map(FaceAttribute::facepp_name)
            .collect::<Vec<_>>()
            .join(",");

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("api_secret", self.config.api_secret.clone())
            .text("return_attributes", return_attributes.clone())
            .part("image_file", Part::bytes(image.to_vec()).file_name("image"));

        debug!(
            "Sending {} byte image to Face++ (return_attributes={})",
            image.len(),
            return_attributes
        );

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(Self::NAME, e))?;

        info!(provider = Self::NAME, status = %status, "Face++ responded");
        debug!(provider = Self::NAME, body = %body, "Face++ response body");

        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: Self::NAME,
                status,
                body,
            });
        }

        let parsed: FaceppDetectResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(Self::NAME, e))?;

        let Some(face) = parsed.faces.into_iter().next() else {
            return Ok(None);
        };

        let bundle = match face.attributes {
            Some(attrs) => AttributeBundle::from(attrs),
            None if attributes.is_empty() => AttributeBundle::default(),
            None => {
                return Err(ProviderError::invalid_response(
                    Self::NAME,
                    "face has no 'attributes' object",
                ))
            }
        };
        ensure_requested(Self::NAME, &bundle, attributes)?;

        Ok(Some(bundle))
    }
}
