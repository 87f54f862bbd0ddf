use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use intervue_core::AppError;

use crate::state::BoxFuture;

use super::model::Question;

pub trait QuestionBank: Send + Sync {
    fn insert<'a>(&'a self, question: Question) -> BoxFuture<'a, Result<Question, AppError>>;

    /// Oldest first.
    fn list<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Question>, AppError>>;

    fn get<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<Option<Question>, AppError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryQuestionBank {
    questions: RwLock<HashMap<Uuid, Question>>,
}

impl QuestionBank for InMemoryQuestionBank {
    fn insert<'a>(&'a self, question: Question) -> BoxFuture<'a, Result<Question, AppError>> {
        Box::pin(async move {
            let mut questions = self.questions.write().await;
            if questions.contains_key(&question.id) {
                return Err(AppError::conflict("id"));
            }
            questions.insert(question.id, question.clone());
            Ok(question)
        })
    }

    fn list<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Question>, AppError>> {
        Box::pin(async move {
            let questions = self.questions.read().await;
            let mut all: Vec<Question> = questions.values().cloned().collect();
            all.sort_by_key(|question| question.created_at);
            Ok(all)
        })
    }

    fn get<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<Option<Question>, AppError>> {
        Box::pin(async move { Ok(self.questions.read().await.get(&id).cloned()) })
    }
}
