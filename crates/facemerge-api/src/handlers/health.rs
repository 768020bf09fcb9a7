//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub providers: ProviderChecks,
}

#[derive(Serialize)]
pub struct ProviderChecks {
    pub facepp: CheckStatus,
    pub azure: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
}

impl CheckStatus {
    fn configured() -> Self {
        Self {
            status: "configured".to_string(),
        }
    }

    fn disabled() -> Self {
        Self {
            status: "disabled".to_string(),
        }
    }
}

/// Readiness check endpoint (readiness probe).
///
/// Reports which providers are configured. The providers themselves are
/// not contacted.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let azure = if state.detection.azure_enabled() {
        CheckStatus::configured()
    } else {
        CheckStatus::disabled()
    };

    Json(ReadinessResponse {
        status: "ready".to_string(),
        providers: ProviderChecks {
            facepp: CheckStatus::configured(),
            azure,
        },
    })
}
