//! Validation answer repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{QuestionnaireId, ValidationAnswer};

/// Repository trait for validation answer operations.
///
/// The data-entry UI re-saves an answer on every edit, so `save` is
/// insert-or-overwrite rather than insert-only.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ValidationAnswerRepository: Send + Sync {
    /// Persist a validation answer.
    ///
    /// Assigns an identifier when the record carries none; otherwise
    /// overwrites the existing record with that identifier.
    async fn save_validation_answer(
        &self,
        answer: &ValidationAnswer,
    ) -> RepositoryResult<ValidationAnswer>;

    /// Fetch every answer belonging to a questionnaire.
    async fn find_answers_by_questionnaire(
        &self,
        questionnaire_id: QuestionnaireId,
    ) -> RepositoryResult<Vec<ValidationAnswer>>;

    /// Delete all answers of one grid row of a questionnaire.
    ///
    /// Deleting a row that holds no answers is not an error.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of answers removed
    async fn delete_answers_by_questionnaire_and_row(
        &self,
        questionnaire_id: QuestionnaireId,
        row_id: i32,
    ) -> RepositoryResult<u64>;
}
