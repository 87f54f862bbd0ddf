use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validator::{FieldRule, RuleSet, Validated};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Behavioral,
    Situational,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Situational => "situational",
            Category::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// An interview question.
///
/// `expected_answer` is reviewer material: it is only serialized for
/// interviewers and admins (see [`Question::visible_to`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub time_limit_seconds: Option<u32>,
    /// Subject of the principal that authored the question.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Strips reviewer-only fields unless `reviewer` is set.
    pub fn visible_to(mut self, reviewer: bool) -> Self {
        if !reviewer {
            self.expected_answer = None;
        }
        self
    }
}

pub const CATEGORIES: &[&str] = &["technical", "behavioral", "situational", "general"];
pub const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuestionRequest {
    pub prompt: String,
    pub category: Category,
    pub difficulty: Option<Difficulty>,
    pub expected_answer: Option<String>,
    pub time_limit_seconds: Option<u32>,
}

static CREATE_QUESTION_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new("create-question")
        .field(FieldRule::new("prompt").trim().required().length(10, 2000))
        .field(FieldRule::new("category").trim().lowercase().required().one_of(CATEGORIES))
        .field(FieldRule::new("difficulty").trim().lowercase().one_of(DIFFICULTIES))
        .field(FieldRule::new("expected_answer").trim().max_length(5000))
        .field(FieldRule::new("time_limit_seconds").integer().range(30.0, 900.0))
});

impl Validated for CreateQuestionRequest {
    fn rules() -> &'static RuleSet {
        &CREATE_QUESTION_RULES
    }
}
