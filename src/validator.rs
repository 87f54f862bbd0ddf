//! Declarative request validation.
//!
//! Each operation declares a [`RuleSet`]: an ordered list of [`FieldRule`]s,
//! each with normalization steps and constraints. [`RuleSet::apply`]
//! evaluates every constraint of every field and reports all violations at
//! once, so a form with three bad fields produces three records in one
//! response.
//!
//! Typed payloads opt in through [`Validated`] and are extracted with
//! [`ValidatedJson`] (JSON bodies) or [`ValidatedForm`] (multipart bodies
//! with attachments).
//!
//! # Example
//!
//! ```ignore
//! static RULES: LazyLock<RuleSet> = LazyLock::new(|| {
//!     RuleSet::new("login")
//!         .field(FieldRule::new("email").trim().lowercase().required().email())
//!         .field(FieldRule::new("password").required())
//! });
//!
//! impl Validated for LoginRequest {
//!     fn rules() -> &'static RuleSet {
//!         &RULES
//!     }
//! }
//!
//! async fn login(ValidatedJson(dto): ValidatedJson<LoginRequest>) { /* ... */ }
//! ```

use axum::{
    Json,
    extract::{
        FromRequest, Multipart, Request,
        multipart::MultipartError,
        rejection::JsonRejection,
    },
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::ValidateEmail;

use intervue_core::{AppError, FieldViolation, UploadRejection};
use intervue_storage::{Attachment, guard::reject};

use crate::state::AppState;

/// Largest accepted text part in a multipart form.
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    Trim,
    Lowercase,
    Uppercase,
}

impl Normalize {
    fn apply(&self, value: &str) -> String {
        match self {
            Normalize::Trim => value.trim().to_string(),
            Normalize::Lowercase => value.to_lowercase(),
            Normalize::Uppercase => value.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required,
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Format(Format),
    OneOf(&'static [&'static str]),
    Range {
        min: f64,
        max: f64,
    },
    /// A JSON number without a fractional part.
    Integer,
    /// Must equal the (normalized) value of another declared field.
    Matches(&'static str),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    normalizers: Vec<Normalize>,
    constraints: Vec<Constraint>,
}

impl FieldRule {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            normalizers: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.field
    }

    pub fn trim(mut self) -> Self {
        self.normalizers.push(Normalize::Trim);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.normalizers.push(Normalize::Lowercase);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.normalizers.push(Normalize::Uppercase);
        self
    }

    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::Required);
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.constraints.push(Constraint::Length {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.push(Constraint::Length {
            min: None,
            max: Some(max),
        });
        self
    }

    pub fn email(mut self) -> Self {
        self.constraints.push(Constraint::Format(Format::Email));
        self
    }

    pub fn uuid(mut self) -> Self {
        self.constraints.push(Constraint::Format(Format::Uuid));
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.constraints.push(Constraint::OneOf(allowed));
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    pub fn integer(mut self) -> Self {
        self.constraints.push(Constraint::Integer);
        self
    }

    pub fn matches(mut self, other: &'static str) -> Self {
        self.constraints.push(Constraint::Matches(other));
        self
    }

    fn normalize(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(
                self.normalizers
                    .iter()
                    .fold(s, |acc, step| step.apply(&acc)),
            ),
            other => other,
        }
    }

    fn is_required(&self) -> bool {
        self.constraints.contains(&Constraint::Required)
    }

    /// Appends one violation per failing constraint.
    fn check(&self, payload: &Map<String, Value>, violations: &mut Vec<FieldViolation>) {
        let field = self.field;
        let value = payload.get(field).filter(|value| !is_blank(value));

        let Some(value) = value else {
            if self.is_required() {
                violations.push(FieldViolation::new(field, format!("{field} is required")));
            }
            return;
        };

        for constraint in self.constraints.iter() {
            if let Some(message) = evaluate(field, constraint, value, payload) {
                violations.push(FieldViolation::new(field, message));
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn evaluate(
    field: &str,
    constraint: &Constraint,
    value: &Value,
    payload: &Map<String, Value>,
) -> Option<String> {
    match constraint {
        Constraint::Required => None,
        Constraint::Length { min, max } => {
            let Some(text) = value.as_str() else {
                return Some(format!("{field} must be a string"));
            };
            let len = text.chars().count();
            match (min, max) {
                (Some(min), _) if len < *min => {
                    Some(format!("{field} must be at least {min} characters"))
                }
                (_, Some(max)) if len > *max => {
                    Some(format!("{field} must be at most {max} characters"))
                }
                _ => None,
            }
        }
        Constraint::Format(format) => {
            let Some(text) = value.as_str() else {
                return Some(format!("{field} must be a string"));
            };
            match format {
                Format::Email if !text.validate_email() => {
                    Some(format!("{field} must be a valid email address"))
                }
                Format::Uuid if Uuid::parse_str(text).is_err() => {
                    Some(format!("{field} must be a valid UUID"))
                }
                _ => None,
            }
        }
        Constraint::OneOf(allowed) => {
            let member = value.as_str().is_some_and(|text| allowed.contains(&text));
            (!member).then(|| format!("{field} must be one of: {}", allowed.join(", ")))
        }
        Constraint::Range { min, max } => match value.as_f64() {
            None => Some(format!("{field} must be a number")),
            Some(n) if n < *min || n > *max => {
                Some(format!("{field} must be between {min} and {max}"))
            }
            Some(_) => None,
        },
        Constraint::Integer => {
            let whole = value.as_number().is_some_and(|n| n.is_i64() || n.is_u64());
            (!whole).then(|| format!("{field} must be a whole number"))
        }
        Constraint::Matches(other) => (payload.get(*other) != Some(value))
            .then(|| format!("{field} must match {other}")),
    }
}

/// An operation's declared fields, evaluated as a set.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    fields: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Keeps only declared fields and runs their normalization steps.
    pub fn normalize(&self, mut payload: Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|rule| {
                payload
                    .remove(rule.field)
                    .map(|value| (rule.field.to_string(), rule.normalize(value)))
            })
            .collect()
    }

    /// Every violation of the already-normalized payload, in declaration order.
    pub fn violations(&self, normalized: &Map<String, Value>) -> Vec<FieldViolation> {
        self.fields.iter().fold(Vec::new(), |mut violations, rule| {
            rule.check(normalized, &mut violations);
            violations
        })
    }

    /// Normalizes and validates `payload`, failing once with every violation.
    pub fn apply(&self, payload: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let normalized = self.normalize(payload);
        let violations = self.violations(&normalized);

        if !violations.is_empty() {
            tracing::debug!(
                rule_set = self.name,
                violations = violations.len(),
                "Payload failed validation"
            );
            return Err(AppError::validation(violations));
        }

        Ok(normalized)
    }

    /// Validates and deserializes into the operation's DTO.
    pub fn parse<T: DeserializeOwned>(&self, payload: Map<String, Value>) -> Result<T, AppError> {
        let normalized = self.apply(payload)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| AppError::invalid_field("body", format!("Invalid request body: {e}")))
    }
}

/// A payload type with a declared rule set.
pub trait Validated: DeserializeOwned {
    fn rules() -> &'static RuleSet;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Validated + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::MissingJsonContentType(_) => AppError::invalid_field(
                    "body",
                    "Missing 'Content-Type: application/json' header",
                ),
                _ => AppError::invalid_field("body", "Invalid request body"),
            })?;

        let Value::Object(payload) = value else {
            return Err(AppError::invalid_field(
                "body",
                "Request body must be a JSON object",
            ));
        };

        T::rules().parse(payload).map(ValidatedJson)
    }
}

/// A validated multipart form plus its file parts.
///
/// Text parts are validated with `T`'s rule set. File parts are buffered
/// (at most one byte past the upload limit) and handed to the upload guard by the
/// handler.
#[derive(Debug)]
pub struct ValidatedForm<T> {
    pub data: T,
    pub attachments: Vec<Attachment>,
}

impl<T> FromRequest<AppState> for ValidatedForm<T>
where
    T: Validated + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_field("body", rejection.body_text()))?;

        let max_bytes = state.uploads.max_bytes();
        let mut payload = Map::new();
        let mut attachments = Vec::new();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_bytes))? {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let mut bytes = Vec::new();

                // Buffer one byte past the limit so the guard can still
                // report the size after the extension and MIME checks.
                let cap = usize::try_from(max_bytes.saturating_add(1)).unwrap_or(usize::MAX);
                while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max_bytes))? {
                    let room = cap.saturating_sub(bytes.len());
                    bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }

                attachments.push(Attachment {
                    field: name,
                    file_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let mut text = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max_bytes))? {
                if text.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(AppError::invalid_field(
                        name,
                        format!("field exceeds {MAX_TEXT_FIELD_BYTES} bytes"),
                    ));
                }
                text.extend_from_slice(&chunk);
            }
            let text = String::from_utf8(text)
                .map_err(|_| AppError::invalid_field(name.clone(), "must be valid UTF-8 text"))?;
            payload.insert(name, Value::String(text));
        }

        let data = T::rules().parse(payload)?;
        Ok(ValidatedForm { data, attachments })
    }
}

fn multipart_error(err: MultipartError, max_bytes: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return reject(UploadRejection::TooLarge { max_bytes });
    }
    AppError::invalid_field("body", err.body_text())
}
