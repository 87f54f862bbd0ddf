//! Answer intake and the analysis seam.
//!
//! Inference (speech-to-text, vocal tone, facial emotion, semantic scoring)
//! lives outside this service. [`AnswerAnalyzer`] is the boundary: it receives
//! an accepted, stored submission and reports a result record.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use intervue_auth::Principal;
use intervue_core::AppError;
use intervue_storage::Attachment;

use crate::metrics::track_answer_submitted;
use crate::state::{AppState, BoxFuture};

use super::model::{
    AUDIO_FIELD, AnalysisResult, AnalysisState, AnswerReceipt, AnswerSubmission, Language,
    SubmitAnswerForm,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyzerStatus {
    pub name: String,
    pub ready: bool,
    /// Language code to display name.
    pub supported_languages: BTreeMap<String, String>,
}

pub trait AnswerAnalyzer: Send + Sync {
    fn status(&self) -> AnalyzerStatus;

    fn analyze<'a>(
        &'a self,
        submission: &'a AnswerSubmission,
    ) -> BoxFuture<'a, Result<AnalysisResult, AppError>>;
}

/// Accepts every submission and leaves it queued for an out-of-process
/// worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredAnalyzer;

impl DeferredAnalyzer {
    pub const NAME: &'static str = "deferred";
}

impl AnswerAnalyzer for DeferredAnalyzer {
    fn status(&self) -> AnalyzerStatus {
        AnalyzerStatus {
            name: Self::NAME.to_string(),
            ready: true,
            supported_languages: Language::ALL
                .iter()
                .map(|lang| (lang.as_str().to_string(), lang.display_name().to_string()))
                .collect(),
        }
    }

    fn analyze<'a>(
        &'a self,
        submission: &'a AnswerSubmission,
    ) -> BoxFuture<'a, Result<AnalysisResult, AppError>> {
        Box::pin(async move {
            info!(submission_id = %submission.id, "Answer queued for analysis");
            Ok(AnalysisResult {
                state: AnalysisState::Queued,
                analyzer: Self::NAME.to_string(),
                scores: None,
            })
        })
    }
}

pub struct AnswerService;

impl AnswerService {
    /// Checks the attachment, confirms the question exists, stores the audio
    /// and hands the submission to the analyzer.
    ///
    /// Upload rejections win over an unknown question, and nothing is
    /// written unless both pass.
    #[instrument(skip(state, form, attachments), fields(candidate = %candidate.subject))]
    pub async fn submit(
        state: &AppState,
        candidate: &Principal,
        form: SubmitAnswerForm,
        attachments: Vec<Attachment>,
    ) -> Result<AnswerReceipt, AppError> {
        let audio = state.uploads.single(attachments, AUDIO_FIELD)?;
        state
            .uploads
            .inspect(&audio)
            .map_err(intervue_storage::guard::reject)?;

        if state.questions.get(form.question_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Question {} not found",
                form.question_id
            )));
        }

        let descriptor = state.uploads.store(audio).await?;

        let submission = AnswerSubmission {
            id: Uuid::new_v4(),
            question_id: form.question_id,
            candidate: candidate.subject.clone(),
            language: form.language.unwrap_or_default(),
            task: form.task.unwrap_or_default(),
            transcript: form.transcript,
            audio: descriptor,
            submitted_at: Utc::now(),
        };

        let analysis = state.analyzer.analyze(&submission).await?;
        track_answer_submitted(submission.task.as_str());

        Ok(AnswerReceipt {
            submission,
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_analyzer_reports_supported_languages() {
        let status = DeferredAnalyzer.status();
        assert!(status.ready);
        assert_eq!(status.supported_languages.get("en").map(String::as_str), Some("English"));
        assert_eq!(status.supported_languages.get("ur").map(String::as_str), Some("Urdu"));
    }
}
