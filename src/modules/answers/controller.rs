use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use intervue_core::{ApiResponse, AppError, ErrorBody};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedForm;

use super::model::{AnswerReceipt, SubmitAnswerForm, SubmitAnswerMultipart};
use super::service::AnswerService;

/// Submit a recorded answer
#[utoipa::path(
    post,
    path = "/api/answers",
    request_body(content = SubmitAnswerMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Answer stored and queued for analysis", body = AnswerReceipt),
        (status = 400, description = "Validation error or rejected upload", body = ErrorBody),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody),
        (status = 403, description = "Candidate role required", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody),
        (status = 413, description = "Recording too large", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Answers"
)]
#[instrument(skip(state, auth_user, form), fields(subject = %auth_user.subject()))]
pub async fn submit_answer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    form: ValidatedForm<SubmitAnswerForm>,
) -> Result<(StatusCode, ApiResponse<AnswerReceipt>), AppError> {
    let receipt = AnswerService::submit(&state, &auth_user.0, form.data, form.attachments).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(receipt)))
}
