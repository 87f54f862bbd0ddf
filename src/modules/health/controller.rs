use axum::extract::State;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use intervue_core::ApiResponse;

use crate::modules::answers::service::AnalyzerStatus;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub upload_dir_ready: bool,
    pub analyzer: AnalyzerStatus,
}

/// Liveness and collaborator readiness
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let environment = if state.server_config.is_development() {
        "development"
    } else {
        "production"
    };

    ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: environment.to_string(),
        upload_dir_ready: state.uploads.dir().is_dir(),
        analyzer: state.analyzer.status(),
    })
}
