//! Error taxonomy and classification for the request pipeline.
//!
//! Every pipeline stage returns `Result<_, AppError>`. At the boundary the
//! error is turned into an [`ErrorRecord`] by [`AppError::classify`], a single
//! exhaustive match that fixes the kind, HTTP status and public message of
//! each failure.
//!
//! The rendered [`ErrorBody`] carries `detail` and `stack` only when asked
//! to expose them; the record itself always keeps them so the server can log
//! them.

use std::backtrace::BacktraceStatus;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Message shown for every programming defect.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a credential was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Access denied. No token provided.")]
    MissingToken,
    #[error("Token has expired. Please login again.")]
    Expired,
    #[error("Invalid token. Please login again.")]
    Invalid,
    #[error("Invalid email or password.")]
    InvalidCredentials,
}

impl AuthFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "no_token",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
            Self::InvalidCredentials => "invalid_credentials",
        }
    }
}

/// Why an attachment was refused by the upload guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Invalid file extension '{extension}'. Allowed extensions: {allowed}")]
    InvalidExtension { extension: String, allowed: String },

    #[error("Invalid content type '{received}'. Allowed types: {allowed}")]
    InvalidContentType { received: String, allowed: String },

    #[error("File too large. Maximum size is {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },

    #[error("Too many files. At most {max} file(s) may be uploaded")]
    TooManyFiles { max: usize },
}

impl UploadRejection {
    /// Stable label used in logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidExtension { .. } => "invalid_extension",
            Self::InvalidContentType { .. } => "invalid_content_type",
            Self::TooLarge { .. } => "too_large",
            Self::TooManyFiles { .. } => "too_many_files",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    ValidationFailed,
    UploadRejected,
    NotFound,
    MethodNotAllowed,
    Conflict,
    MalformedIdentifier,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::ValidationFailed => "validation_failed",
            Self::UploadRejected => "upload_rejected",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Conflict => "conflict",
            Self::MalformedIdentifier => "malformed_identifier",
            Self::InternalError => "internal_error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Unauthenticated(#[from] AuthFailure),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed")]
    ValidationFailed(Vec<FieldViolation>),

    #[error(transparent)]
    UploadRejected(#[from] UploadRejection),

    #[error("{0}")]
    NotFound(String),

    /// The path exists but not for this method.
    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// A uniqueness constraint was violated on `field`.
    #[error("{field} already exists")]
    Conflict { field: String },

    #[error("Invalid {field}: malformed identifier")]
    MalformedIdentifier { field: String, value: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthenticated(failure: AuthFailure) -> Self {
        Self::Unauthenticated(failure)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::ValidationFailed(violations)
    }

    /// Shorthand for a validation failure on one field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed(vec![FieldViolation::new(field, message)])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn method_not_allowed(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
        }
    }

    pub fn malformed_id(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::UploadRejected(_) => ErrorKind::UploadRejected,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
            Self::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Maps this error to its stable (kind, status, message) triple.
    pub fn classify(&self) -> ErrorRecord {
        let kind = self.kind();
        let (status, message) = match self {
            Self::Unauthenticated(failure) => (StatusCode::UNAUTHORIZED, failure.to_string()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            Self::ValidationFailed(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::UploadRejected(rejection @ UploadRejection::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, rejection.to_string())
            }
            Self::UploadRejected(rejection) => (StatusCode::BAD_REQUEST, rejection.to_string()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::MethodNotAllowed { .. } => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            Self::Conflict { .. } => (StatusCode::CONFLICT, self.to_string()),
            Self::MalformedIdentifier { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };

        let violations = match self {
            Self::ValidationFailed(violations) => violations.clone(),
            _ => Vec::new(),
        };

        let (detail, backtrace) = match self {
            Self::Internal(err) => {
                let backtrace = err.backtrace();
                let backtrace = (backtrace.status() == BacktraceStatus::Captured)
                    .then(|| backtrace.to_string());
                (Some(format!("{err:#}")), backtrace)
            }
            other => (Some(format!("{other:?}")), None),
        };

        ErrorRecord {
            kind,
            status,
            message,
            operational: kind != ErrorKind::InternalError,
            violations,
            detail,
            backtrace,
        }
    }
}

/// The classified form of an [`AppError`].
///
/// Stored in the response extensions so the error boundary can log it and
/// decide how much of it to expose.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
    /// `false` only for programming defects.
    pub operational: bool,
    pub violations: Vec<FieldViolation>,
    pub detail: Option<String>,
    pub backtrace: Option<String>,
}

impl ErrorRecord {
    pub fn body(&self, expose_detail: bool) -> ErrorBody {
        ErrorBody {
            success: false,
            kind: self.kind,
            message: self.message.clone(),
            errors: (!self.violations.is_empty()).then(|| self.violations.clone()),
            detail: self.detail.clone().filter(|_| expose_detail),
            stack: self.backtrace.clone().filter(|_| expose_detail),
        }
    }

    pub fn into_response(self, expose_detail: bool) -> Response {
        let body = self.body(expose_detail);
        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.classify().into_response(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_unauthenticated_messages_distinguish_subtypes() {
        let missing = AppError::from(AuthFailure::MissingToken).classify();
        let expired = AppError::from(AuthFailure::Expired).classify();
        let invalid = AppError::from(AuthFailure::Invalid).classify();

        for record in [&missing, &expired, &invalid] {
            assert_eq!(record.status, StatusCode::UNAUTHORIZED);
            assert_eq!(record.kind, ErrorKind::Unauthenticated);
        }
        assert_eq!(missing.message, "Access denied. No token provided.");
        assert_eq!(expired.message, "Token has expired. Please login again.");
        assert_eq!(invalid.message, "Invalid token. Please login again.");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::forbidden("nope"), StatusCode::FORBIDDEN),
            (AppError::invalid_field("email", "bad"), StatusCode::BAD_REQUEST),
            (AppError::not_found("missing"), StatusCode::NOT_FOUND),
            (AppError::conflict("email"), StatusCode::CONFLICT),
            (AppError::malformed_id("id", "xyz"), StatusCode::BAD_REQUEST),
            (AppError::internal(anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.classify().status, status, "{error:?}");
        }
    }

    #[test]
    fn test_upload_too_large_is_413_others_400() {
        let too_large = AppError::from(UploadRejection::TooLarge { max_bytes: 10 });
        assert_eq!(too_large.classify().status, StatusCode::PAYLOAD_TOO_LARGE);

        let rejections = [
            UploadRejection::InvalidExtension {
                extension: "exe".into(),
                allowed: "wav".into(),
            },
            UploadRejection::InvalidContentType {
                received: "text/plain".into(),
                allowed: "audio/".into(),
            },
            UploadRejection::TooManyFiles { max: 1 },
        ];
        for rejection in rejections {
            let record = AppError::from(rejection).classify();
            assert_eq!(record.status, StatusCode::BAD_REQUEST);
            assert_eq!(record.kind, ErrorKind::UploadRejected);
        }
    }

    #[test]
    fn test_conflict_message_names_field() {
        let record = AppError::conflict("email").classify();
        assert_eq!(record.message, "email already exists");
    }

    #[test]
    fn test_only_internal_is_not_operational() {
        assert!(!AppError::internal(anyhow!("bug")).classify().operational);
        assert!(AppError::forbidden("x").classify().operational);
        assert!(AppError::from(AuthFailure::Invalid).classify().operational);
    }

    #[test]
    fn test_internal_message_is_generic() {
        let record = AppError::internal(anyhow!("db password is hunter2")).classify();
        assert_eq!(record.message, INTERNAL_ERROR_MESSAGE);
        assert!(record.detail.unwrap().contains("hunter2"));
    }

    #[test]
    fn test_body_hides_detail_unless_exposed() {
        let record = AppError::internal(anyhow!("secret detail")).classify();

        let public = serde_json::to_value(record.body(false)).unwrap();
        assert_eq!(public["success"], false);
        assert_eq!(public["kind"], "internal_error");
        assert!(public.get("detail").is_none());
        assert!(public.get("stack").is_none());

        let dev = serde_json::to_value(record.body(true)).unwrap();
        assert!(dev["detail"].as_str().unwrap().contains("secret detail"));
    }

    #[test]
    fn test_body_lists_every_violation() {
        let record = AppError::validation(vec![
            FieldViolation::new("email", "email must be a valid email address"),
            FieldViolation::new("password", "password must be at least 8 characters"),
        ])
        .classify();

        let body = serde_json::to_value(record.body(false)).unwrap();
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "email");
        assert_eq!(errors[1]["field"], "password");
        assert_eq!(body["message"], "Validation failed");
    }

    #[test]
    fn test_errors_omitted_when_no_violations() {
        let body = serde_json::to_value(AppError::forbidden("x").classify().body(false)).unwrap();
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_into_response_attaches_record() {
        let response = AppError::conflict("email").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let record = response.extensions().get::<ErrorRecord>().unwrap();
        assert_eq!(record.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_method_not_allowed_is_operational() {
        let record = AppError::method_not_allowed("GET", "/api/auth/register").classify();
        assert_eq!(record.kind, ErrorKind::MethodNotAllowed);
        assert_eq!(record.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(record.message, "Method GET not allowed on /api/auth/register");
        assert!(record.operational);
    }
}
