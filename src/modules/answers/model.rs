//! Answer submission models.
//!
//! A candidate submits one recorded answer per request as
//! `multipart/form-data`: the text fields below plus exactly one `audio`
//! file part.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use intervue_storage::UploadDescriptor;

use crate::validator::{FieldRule, RuleSet, Validated};

/// Form field that carries the recording.
pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ur,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ur];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ur => "ur",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ur => "Urdu",
        }
    }
}

/// What speech-to-text should do with the recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpeechTask {
    #[default]
    Transcribe,
    /// Translate to English.
    Translate,
}

impl SpeechTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechTask::Transcribe => "transcribe",
            SpeechTask::Translate => "translate",
        }
    }
}

/// Text parts of the submission form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAnswerForm {
    pub question_id: Uuid,
    pub language: Option<Language>,
    pub task: Option<SpeechTask>,
    /// Client-side transcript, if the browser produced one.
    pub transcript: Option<String>,
}

static SUBMIT_ANSWER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new("submit-answer")
        .field(FieldRule::new("question_id").trim().required().uuid())
        .field(FieldRule::new("language").trim().lowercase().one_of(&["en", "ur"]))
        .field(FieldRule::new("task").trim().lowercase().one_of(&["transcribe", "translate"]))
        .field(FieldRule::new("transcript").trim().max_length(10_000))
});

impl Validated for SubmitAnswerForm {
    fn rules() -> &'static RuleSet {
        &SUBMIT_ANSWER_RULES
    }
}

/// Multipart shape of `POST /api/answers`, for the OpenAPI document only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct SubmitAnswerMultipart {
    pub question_id: String,
    pub language: Option<String>,
    pub task: Option<String>,
    pub transcript: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub audio: String,
}

/// An accepted answer as handed to the analyzer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerSubmission {
    pub id: Uuid,
    pub question_id: Uuid,
    /// Subject of the submitting candidate.
    pub candidate: String,
    pub language: Language,
    pub task: SpeechTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub audio: UploadDescriptor,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    Queued,
    Completed,
    Failed,
}

/// What the analyzer reported for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalysisResult {
    pub state: AnalysisState,
    pub analyzer: String,
    /// Analyzer-defined scores, absent until analysis completes.
    #[schema(value_type = Object)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerReceipt {
    pub submission: AnswerSubmission,
    pub analysis: AnalysisResult,
}
