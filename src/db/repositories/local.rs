//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::*;
use crate::db::repository::*;

/// In-memory local repository.
///
/// All data lives in HashMaps behind a single `RwLock`, which serializes
/// conflicting writes the way the relational store would at the row level.
///
/// # Example
/// ```
/// use qval_rust::db::repositories::LocalRepository;
/// use qval_rust::db::repository::QuestionnaireRepository;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// let questionnaires = repo.list_questionnaires().await.unwrap();
/// assert!(questionnaires.is_empty());
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    preconditions: HashMap<PreconditionId, FeaturePrecondition>,
    questionnaires: HashMap<QuestionnaireId, Questionnaire>,
    answers: HashMap<AnswerId, ValidationAnswer>,

    // Read-only reference tables, seeded via the *_impl helpers
    validations: Vec<Validation>,
    summaries: Vec<ValidationSummary>,
    values: Vec<ValidationValue>,
    combination_results: Vec<ValidationCombinationResult>,

    // ID counters
    next_precondition_id: i32,
    next_questionnaire_id: i32,
    next_answer_id: i32,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            preconditions: HashMap::new(),
            questionnaires: HashMap::new(),
            answers: HashMap::new(),
            validations: Vec::new(),
            summaries: Vec::new(),
            values: Vec::new(),
            combination_results: Vec::new(),
            next_precondition_id: 1,
            next_questionnaire_id: 1,
            next_answer_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Seed a validation rule. Helper for setting up reference data.
    pub fn insert_validation_impl(&self, validation: Validation) {
        let mut data = self.data.write().unwrap();
        data.validations.push(validation);
    }

    /// Seed a validation summary. Helper for setting up reference data.
    pub fn insert_validation_summary_impl(&self, summary: ValidationSummary) {
        let mut data = self.data.write().unwrap();
        data.summaries.push(summary);
    }

    /// Seed a selectable validation value. Helper for setting up reference data.
    pub fn insert_validation_value_impl(&self, value: ValidationValue) {
        let mut data = self.data.write().unwrap();
        data.values.push(value);
    }

    /// Seed a combination result. Helper for setting up reference data.
    pub fn insert_combination_result_impl(&self, result: ValidationCombinationResult) {
        let mut data = self.data.write().unwrap();
        data.combination_results.push(result);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of preconditions stored.
    pub fn precondition_count(&self) -> usize {
        self.data.read().unwrap().preconditions.len()
    }

    /// Get the number of questionnaires stored.
    pub fn questionnaire_count(&self) -> usize {
        self.data.read().unwrap().questionnaires.len()
    }

    /// Get the number of validation answers stored.
    pub fn answer_count(&self) -> usize {
        self.data.read().unwrap().answers.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn attach_answers(data: &LocalData, questionnaire: &Questionnaire) -> Questionnaire {
    let id = questionnaire.id;
    let mut answers: Vec<ValidationAnswer> = data
        .answers
        .values()
        .filter(|a| Some(a.questionnaire_id) == id)
        .cloned()
        .collect();
    answers.sort_by_key(|a| a.id.map(|id| id.value()).unwrap_or(0));

    Questionnaire {
        id: questionnaire.id,
        name: questionnaire.name.clone(),
        validation_answers: answers,
    }
}

#[async_trait]
impl PreconditionRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn save_precondition(
        &self,
        precondition: &FeaturePrecondition,
    ) -> RepositoryResult<FeaturePrecondition> {
        let mut data = self.data.write().unwrap();

        let id = match precondition.id {
            Some(id) => {
                if !data.preconditions.contains_key(&id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("No precondition with id {}", id),
                        ErrorContext::new("save_precondition")
                            .with_entity("precondition")
                            .with_entity_id(id),
                    ));
                }
                id
            }
            None => {
                let id = PreconditionId::new(data.next_precondition_id);
                data.next_precondition_id += 1;
                id
            }
        };

        let persisted = FeaturePrecondition {
            id: Some(id),
            answer: precondition.answer.clone(),
        };
        data.preconditions.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn find_precondition(
        &self,
        id: PreconditionId,
    ) -> RepositoryResult<Option<FeaturePrecondition>> {
        Ok(self.data.read().unwrap().preconditions.get(&id).cloned())
    }
}

#[async_trait]
impl QuestionnaireRepository for LocalRepository {
    async fn save_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> RepositoryResult<Questionnaire> {
        let mut data = self.data.write().unwrap();

        let id = match questionnaire.id {
            Some(id) => {
                if !data.questionnaires.contains_key(&id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("No questionnaire with id {}", id),
                        ErrorContext::new("save_questionnaire")
                            .with_entity("questionnaire")
                            .with_entity_id(id),
                    ));
                }
                id
            }
            None => {
                let id = QuestionnaireId::new(data.next_questionnaire_id);
                data.next_questionnaire_id += 1;
                id
            }
        };

        let stored = Questionnaire {
            id: Some(id),
            name: questionnaire.name.clone(),
            validation_answers: Vec::new(),
        };
        data.questionnaires.insert(id, stored.clone());
        Ok(attach_answers(&data, &stored))
    }

    async fn find_questionnaire(
        &self,
        id: QuestionnaireId,
    ) -> RepositoryResult<Option<Questionnaire>> {
        let data = self.data.read().unwrap();
        Ok(data
            .questionnaires
            .get(&id)
            .map(|q| attach_answers(&data, q)))
    }

    async fn list_questionnaires(&self) -> RepositoryResult<Vec<Questionnaire>> {
        let data = self.data.read().unwrap();
        let mut questionnaires: Vec<Questionnaire> = data
            .questionnaires
            .values()
            .map(|q| attach_answers(&data, q))
            .collect();
        questionnaires.sort_by_key(|q| q.id.map(|id| id.value()).unwrap_or(0));
        Ok(questionnaires)
    }

    async fn delete_questionnaire(&self, id: QuestionnaireId) -> RepositoryResult<u64> {
        let mut data = self.data.write().unwrap();

        if data.questionnaires.remove(&id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("No questionnaire with id {}", id),
                ErrorContext::new("delete_questionnaire")
                    .with_entity("questionnaire")
                    .with_entity_id(id),
            ));
        }

        let before = data.answers.len();
        data.answers.retain(|_, a| a.questionnaire_id != id);
        let removed_answers = (before - data.answers.len()) as u64;
        Ok(removed_answers + 1)
    }
}

#[async_trait]
impl ValidationAnswerRepository for LocalRepository {
    async fn save_validation_answer(
        &self,
        answer: &ValidationAnswer,
    ) -> RepositoryResult<ValidationAnswer> {
        let mut data = self.data.write().unwrap();

        let id = match answer.id {
            Some(id) => {
                if !data.answers.contains_key(&id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("No validation answer with id {}", id),
                        ErrorContext::new("save_validation_answer")
                            .with_entity("validation_answer")
                            .with_entity_id(id),
                    ));
                }
                id
            }
            None => {
                let id = AnswerId::new(data.next_answer_id);
                data.next_answer_id += 1;
                id
            }
        };

        let persisted = ValidationAnswer {
            id: Some(id),
            ..answer.clone()
        };
        data.answers.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn find_answers_by_questionnaire(
        &self,
        questionnaire_id: QuestionnaireId,
    ) -> RepositoryResult<Vec<ValidationAnswer>> {
        let data = self.data.read().unwrap();
        let mut answers: Vec<ValidationAnswer> = data
            .answers
            .values()
            .filter(|a| a.questionnaire_id == questionnaire_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.id.map(|id| id.value()).unwrap_or(0));
        Ok(answers)
    }

    async fn delete_answers_by_questionnaire_and_row(
        &self,
        questionnaire_id: QuestionnaireId,
        row_id: i32,
    ) -> RepositoryResult<u64> {
        let mut data = self.data.write().unwrap();
        let before = data.answers.len();
        data.answers
            .retain(|_, a| !(a.questionnaire_id == questionnaire_id && a.row_id == row_id));
        Ok((before - data.answers.len()) as u64)
    }
}

#[async_trait]
impl ValidationReferenceRepository for LocalRepository {
    async fn list_validations(&self) -> RepositoryResult<Vec<Validation>> {
        Ok(self.data.read().unwrap().validations.clone())
    }

    async fn list_validation_summaries(&self) -> RepositoryResult<Vec<ValidationSummary>> {
        Ok(self.data.read().unwrap().summaries.clone())
    }

    async fn list_validation_values(&self) -> RepositoryResult<Vec<ValidationValue>> {
        Ok(self.data.read().unwrap().values.clone())
    }

    async fn list_validation_combination_results(
        &self,
    ) -> RepositoryResult<Vec<ValidationCombinationResult>> {
        Ok(self.data.read().unwrap().combination_results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_assigns_sequential_precondition_ids() {
        let repo = LocalRepository::new();
        let first = repo
            .save_precondition(&FeaturePrecondition::new("a"))
            .await
            .unwrap();
        let second = repo
            .save_precondition(&FeaturePrecondition::new("b"))
            .await
            .unwrap();
        assert_eq!(first.id, Some(PreconditionId::new(1)));
        assert_eq!(second.id, Some(PreconditionId::new(2)));
    }

    #[tokio::test]
    async fn clear_resets_id_counters() {
        let repo = LocalRepository::new();
        repo.save_precondition(&FeaturePrecondition::new("a"))
            .await
            .unwrap();
        repo.clear();
        let p = repo
            .save_precondition(&FeaturePrecondition::new("b"))
            .await
            .unwrap();
        assert_eq!(p.id, Some(PreconditionId::new(1)));
        assert_eq!(repo.precondition_count(), 1);
    }

    #[tokio::test]
    async fn health_toggle_is_reported() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }
}
