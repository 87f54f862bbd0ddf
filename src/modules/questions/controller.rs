use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use intervue_core::{ApiResponse, AppError, ErrorBody};

use crate::metrics::track_question_created;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::role::is_reviewer;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CreateQuestionRequest, Question};

/// List questions
///
/// `expected_answer` is included only for interviewers and admins.
#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "All questions", body = Vec<Question>)
    ),
    tag = "Questions"
)]
#[instrument(skip(state, viewer))]
pub async fn list_questions(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
) -> Result<ApiResponse<Vec<Question>>, AppError> {
    let reviewer = is_reviewer(viewer.role());
    let questions: Vec<Question> = state
        .questions
        .list()
        .await?
        .into_iter()
        .map(|question| question.visible_to(reviewer))
        .collect();

    Ok(ApiResponse::ok(questions))
}

/// Create a question
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing, expired or invalid token", body = ErrorBody),
        (status = 403, description = "Interviewer or admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Questions"
)]
#[instrument(skip(state, auth_user, dto), fields(subject = %auth_user.subject()))]
pub async fn create_question(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, ApiResponse<Question>), AppError> {
    let question = state
        .questions
        .insert(Question {
            id: Uuid::new_v4(),
            prompt: dto.prompt,
            category: dto.category,
            difficulty: dto.difficulty.unwrap_or_default(),
            expected_answer: dto.expected_answer,
            time_limit_seconds: dto.time_limit_seconds,
            created_by: auth_user.subject().to_string(),
            created_at: Utc::now(),
        })
        .await?;

    track_question_created(question.category.as_str());
    Ok((StatusCode::CREATED, ApiResponse::ok(question)))
}

/// Get a question by ID
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question found", body = Question),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 404, description = "Question not found", body = ErrorBody)
    ),
    tag = "Questions"
)]
#[instrument(skip(state, viewer))]
pub async fn get_question(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Question>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::malformed_id("id", id.as_str()))?;

    let question = state
        .questions
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Question {id} not found")))?;

    Ok(ApiResponse::ok(question.visible_to(is_reviewer(viewer.role()))))
}
