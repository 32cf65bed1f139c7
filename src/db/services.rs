//! High-level database service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! implementation of the repository traits. Almost everything here is a
//! pass-through to the persistence boundary; the one real business rule is
//! the feature precondition create/update workflow.
//!
//! No function in this layer recovers from a failure: every error
//! propagates unchanged to the caller, which owns user-visible handling.

use log::info;

use crate::api::{
    FeaturePrecondition, PreconditionId, Questionnaire, QuestionnaireId, Validation,
    ValidationAnswer, ValidationCombinationResult, ValidationSummary, ValidationValue,
};
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Feature Preconditions ====================

/// Create a new feature precondition from an answer string.
///
/// Constructs a record with no identifier, persists it, and returns the
/// persisted record including its newly assigned identifier. A rejected
/// write surfaces unchanged.
pub async fn create_precondition<R: FullRepository + ?Sized>(
    repo: &R,
    answer: &str,
) -> RepositoryResult<FeaturePrecondition> {
    info!("Service layer: creating feature precondition");

    repo.save_precondition(&FeaturePrecondition::new(answer))
        .await
}

/// Update an existing feature precondition by identifier.
///
/// Looks up the record, replaces its answer, and persists the change.
/// Last-write-wins on concurrent updates to the same identifier; no
/// locking is applied.
///
/// # Returns
/// * `Ok(FeaturePrecondition)` - The updated record
/// * `Err(RepositoryError::NotFound)` - No precondition with that id
pub async fn update_precondition<R: FullRepository + ?Sized>(
    repo: &R,
    id: PreconditionId,
    answer: &str,
) -> RepositoryResult<FeaturePrecondition> {
    info!("Service layer: updating feature precondition id={}", id);

    let mut precondition = repo.find_precondition(id).await?.ok_or_else(|| {
        RepositoryError::not_found_with_context(
            format!("No precondition with id {}", id),
            ErrorContext::new("update_precondition")
                .with_entity("precondition")
                .with_entity_id(id),
        )
    })?;

    precondition.answer = answer.to_string();
    repo.save_precondition(&precondition).await
}

// ==================== Questionnaires ====================

/// Fetch every questionnaire with its answers attached.
pub async fn list_questionnaires<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Questionnaire>> {
    repo.list_questionnaires().await
}

/// Create a questionnaire, or rename an existing one when an id is given.
pub async fn save_questionnaire<R: FullRepository + ?Sized>(
    repo: &R,
    questionnaire: &Questionnaire,
) -> RepositoryResult<Questionnaire> {
    info!(
        "Service layer: saving questionnaire '{}' (id={:?})",
        questionnaire.name, questionnaire.id
    );

    repo.save_questionnaire(questionnaire).await
}

/// Delete a questionnaire and its answers.
pub async fn delete_questionnaire<R: FullRepository + ?Sized>(
    repo: &R,
    id: QuestionnaireId,
) -> RepositoryResult<u64> {
    info!("Service layer: deleting questionnaire id={}", id);

    repo.delete_questionnaire(id).await
}

// ==================== Validation Answers ====================

/// Persist a validation answer (insert when the id is absent, overwrite
/// when present).
pub async fn save_validation_answer<R: FullRepository + ?Sized>(
    repo: &R,
    answer: &ValidationAnswer,
) -> RepositoryResult<ValidationAnswer> {
    info!(
        "Service layer: saving validation answer (questionnaire={}, row={})",
        answer.questionnaire_id, answer.row_id
    );

    repo.save_validation_answer(answer).await
}

/// Fetch every answer of a questionnaire.
pub async fn list_validation_answers<R: FullRepository + ?Sized>(
    repo: &R,
    questionnaire_id: QuestionnaireId,
) -> RepositoryResult<Vec<ValidationAnswer>> {
    repo.find_answers_by_questionnaire(questionnaire_id).await
}

/// Delete all answers of one grid row of a questionnaire.
pub async fn delete_validation_answer_row<R: FullRepository + ?Sized>(
    repo: &R,
    questionnaire_id: QuestionnaireId,
    row_id: i32,
) -> RepositoryResult<u64> {
    info!(
        "Service layer: deleting answer row (questionnaire={}, row={})",
        questionnaire_id, row_id
    );

    repo.delete_answers_by_questionnaire_and_row(questionnaire_id, row_id)
        .await
}

// ==================== Validation Reference Data ====================

/// Fetch every validation rule, in store order.
pub async fn list_validations<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Validation>> {
    repo.list_validations().await
}

/// Fetch every validation summary, in store order.
pub async fn list_validation_summaries<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ValidationSummary>> {
    repo.list_validation_summaries().await
}

/// Fetch every selectable validation value, in store order.
pub async fn list_validation_values<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ValidationValue>> {
    repo.list_validation_values().await
}

/// Fetch every combination result with its combinations, in store order.
pub async fn list_validation_combination_results<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ValidationCombinationResult>> {
    repo.list_validation_combination_results().await
}
