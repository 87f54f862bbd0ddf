use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use intervue_auth::{Principal, Role};
use intervue_core::{ErrorBody, ErrorKind, FieldViolation};
use intervue_storage::UploadDescriptor;

use crate::modules::answers::model::{
    AnalysisResult, AnalysisState, AnswerReceipt, AnswerSubmission, Language, SpeechTask,
    SubmitAnswerMultipart,
};
use crate::modules::answers::service::AnalyzerStatus;
use crate::modules::auth::model::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, User};
use crate::modules::health::controller::HealthResponse;
use crate::modules::questions::model::{Category, CreateQuestionRequest, Difficulty, Question};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::me,
        crate::modules::questions::controller::list_questions,
        crate::modules::questions::controller::create_question,
        crate::modules::questions::controller::get_question,
        crate::modules::answers::controller::submit_answer,
    ),
    components(
        schemas(
            ErrorBody,
            ErrorKind,
            FieldViolation,
            Role,
            Principal,
            User,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MeResponse,
            Category,
            Difficulty,
            Question,
            CreateQuestionRequest,
            Language,
            SpeechTask,
            SubmitAnswerMultipart,
            UploadDescriptor,
            AnswerSubmission,
            AnalysisState,
            AnalysisResult,
            AnswerReceipt,
            AnalyzerStatus,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Authentication", description = "Account registration, login and identity"),
        (name = "Questions", description = "Interview question bank"),
        (name = "Answers", description = "Recorded answer intake")
    ),
    info(
        title = "Intervue API",
        version = "0.1.0",
        description = "Request-ingress API of an AI-assisted interview platform: bearer authentication, role checks, validation and recorded-answer uploads.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
