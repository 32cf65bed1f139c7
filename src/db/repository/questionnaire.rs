//! Questionnaire repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Questionnaire, QuestionnaireId};

/// Repository trait for questionnaire operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait QuestionnaireRepository: Send + Sync {
    /// Persist a questionnaire (create when id is absent, rename otherwise).
    ///
    /// The `validation_answers` association is ignored on save; answers
    /// have their own save path.
    async fn save_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> RepositoryResult<Questionnaire>;

    /// Fetch a questionnaire by identifier, answers attached.
    async fn find_questionnaire(
        &self,
        id: QuestionnaireId,
    ) -> RepositoryResult<Option<Questionnaire>>;

    /// Fetch every questionnaire, answers attached, in store order.
    async fn list_questionnaires(&self) -> RepositoryResult<Vec<Questionnaire>>;

    /// Delete a questionnaire and its answers.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed (questionnaire plus answers)
    /// * `Err(RepositoryError::NotFound)` - No questionnaire with that id
    async fn delete_questionnaire(&self, id: QuestionnaireId) -> RepositoryResult<u64>;
}
