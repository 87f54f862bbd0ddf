use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use intervue_core::{ApiResponse, AppError, ErrorBody};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
use super::service::AuthService;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<AuthResponse>), AppError> {
    let response = AuthService::register_user(
        state.users.as_ref(),
        dto,
        &state.password_config,
        &state.jwt_config,
    )
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(response)))
}

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let response = AuthService::login_user(state.users.as_ref(), dto, &state.jwt_config).await?;
    Ok(ApiResponse::ok(response))
}

/// The caller's verified identity
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = MeResponse),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user), fields(subject = %auth_user.subject()))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<ApiResponse<MeResponse>, AppError> {
    let response = AuthService::me(state.users.as_ref(), auth_user.0).await?;
    Ok(ApiResponse::ok(response))
}
