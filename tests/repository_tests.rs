//! Tests for LocalRepository.
//!
//! These tests cover the persistence contract of every entity, edge cases,
//! and concurrent access patterns for the in-memory repository
//! implementation.

use std::sync::Arc;

use qval_rust::api::{
    AnswerId, FeaturePrecondition, PreconditionId, Questionnaire, QuestionnaireId, Validation,
    ValidationAnswer, ValidationId, ValidationSummary,
};
use qval_rust::db::repositories::LocalRepository;
use qval_rust::db::repository::{
    PreconditionRepository, QuestionnaireRepository, ValidationAnswerRepository,
    ValidationReferenceRepository,
};

fn create_answer(questionnaire_id: i32, row_id: i32, answer: &str) -> ValidationAnswer {
    ValidationAnswer {
        id: None,
        row_id,
        answer: answer.to_string(),
        answer_type: "TEXT".to_string(),
        questionnaire_id: QuestionnaireId::new(questionnaire_id),
        validation_id: ValidationId::new(1),
    }
}

// =========================================================
// Feature Preconditions
// =========================================================

#[tokio::test]
async fn test_create_precondition_assigns_unused_id() {
    let repo = LocalRepository::new();

    let first = repo
        .save_precondition(&FeaturePrecondition::new("yes"))
        .await
        .unwrap();
    let second = repo
        .save_precondition(&FeaturePrecondition::new("no"))
        .await
        .unwrap();

    assert_eq!(first.answer, "yes");
    assert!(first.id.is_some());
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_update_precondition_is_visible_to_find() {
    let repo = LocalRepository::new();

    let created = repo
        .save_precondition(&FeaturePrecondition::new("yes"))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let updated = repo
        .save_precondition(&FeaturePrecondition {
            id: Some(id),
            answer: "no".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.answer, "no");

    let found = repo.find_precondition(id).await.unwrap().unwrap();
    assert_eq!(found.answer, "no");
}

#[tokio::test]
async fn test_save_precondition_with_unknown_id_fails() {
    let repo = LocalRepository::new();

    let result = repo
        .save_precondition(&FeaturePrecondition {
            id: Some(PreconditionId::new(42)),
            answer: "no".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert!(result.unwrap_err().is_not_found());
    assert_eq!(repo.precondition_count(), 0);
}

#[tokio::test]
async fn test_find_missing_precondition_returns_none() {
    let repo = LocalRepository::new();
    let found = repo.find_precondition(PreconditionId::new(1)).await.unwrap();
    assert!(found.is_none());
}

// =========================================================
// Questionnaires
// =========================================================

#[tokio::test]
async fn test_save_and_list_questionnaires() {
    let repo = LocalRepository::new();

    let first = repo
        .save_questionnaire(&Questionnaire::new("Sprint review"))
        .await
        .unwrap();
    let second = repo
        .save_questionnaire(&Questionnaire::new("Onboarding"))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let questionnaires = repo.list_questionnaires().await.unwrap();
    assert_eq!(questionnaires.len(), 2);
    assert_eq!(questionnaires[0].name, "Sprint review");
    assert_eq!(questionnaires[1].name, "Onboarding");
}

#[tokio::test]
async fn test_rename_questionnaire_keeps_id() {
    let repo = LocalRepository::new();

    let created = repo
        .save_questionnaire(&Questionnaire::new("Draft"))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let renamed = repo
        .save_questionnaire(&Questionnaire {
            id: Some(id),
            name: "Final".to_string(),
            validation_answers: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(renamed.id, Some(id));
    assert_eq!(renamed.name, "Final");
    assert_eq!(repo.questionnaire_count(), 1);
}

#[tokio::test]
async fn test_list_questionnaires_attaches_answers() {
    let repo = LocalRepository::new();

    let questionnaire = repo
        .save_questionnaire(&Questionnaire::new("Sprint review"))
        .await
        .unwrap();
    let qid = questionnaire.id.unwrap();

    repo.save_validation_answer(&create_answer(qid.value(), 1, "a"))
        .await
        .unwrap();
    repo.save_validation_answer(&create_answer(qid.value(), 1, "b"))
        .await
        .unwrap();

    let questionnaires = repo.list_questionnaires().await.unwrap();
    assert_eq!(questionnaires.len(), 1);
    assert_eq!(questionnaires[0].validation_answers.len(), 2);
    assert_eq!(questionnaires[0].validation_answers[0].answer, "a");
}

#[tokio::test]
async fn test_delete_questionnaire_cascades_to_answers() {
    let repo = LocalRepository::new();

    let questionnaire = repo
        .save_questionnaire(&Questionnaire::new("Sprint review"))
        .await
        .unwrap();
    let qid = questionnaire.id.unwrap();

    repo.save_validation_answer(&create_answer(qid.value(), 1, "a"))
        .await
        .unwrap();
    repo.save_validation_answer(&create_answer(qid.value(), 2, "b"))
        .await
        .unwrap();

    let removed = repo.delete_questionnaire(qid).await.unwrap();
    assert_eq!(removed, 3); // questionnaire + 2 answers

    assert_eq!(repo.questionnaire_count(), 0);
    assert_eq!(repo.answer_count(), 0);
}

#[tokio::test]
async fn test_delete_missing_questionnaire_fails() {
    let repo = LocalRepository::new();
    let result = repo.delete_questionnaire(QuestionnaireId::new(9)).await;
    assert!(result.unwrap_err().is_not_found());
}

// =========================================================
// Validation Answers
// =========================================================

#[tokio::test]
async fn test_save_answer_overwrites_by_id() {
    let repo = LocalRepository::new();

    let saved = repo
        .save_validation_answer(&create_answer(1, 1, "draft"))
        .await
        .unwrap();
    let id = saved.id.unwrap();

    let resaved = repo
        .save_validation_answer(&ValidationAnswer {
            answer: "final".to_string(),
            ..saved.clone()
        })
        .await
        .unwrap();

    assert_eq!(resaved.id, Some(id));
    assert_eq!(repo.answer_count(), 1);

    let answers = repo
        .find_answers_by_questionnaire(QuestionnaireId::new(1))
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer, "final");
}

#[tokio::test]
async fn test_save_answer_with_unknown_id_fails() {
    let repo = LocalRepository::new();

    let mut answer = create_answer(1, 1, "draft");
    answer.id = Some(AnswerId::new(77));

    let result = repo.save_validation_answer(&answer).await;
    assert!(result.unwrap_err().is_not_found());
    assert_eq!(repo.answer_count(), 0);
}

#[tokio::test]
async fn test_find_answers_filters_by_questionnaire() {
    let repo = LocalRepository::new();

    repo.save_validation_answer(&create_answer(1, 1, "a"))
        .await
        .unwrap();
    repo.save_validation_answer(&create_answer(2, 1, "b"))
        .await
        .unwrap();

    let answers = repo
        .find_answers_by_questionnaire(QuestionnaireId::new(1))
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer, "a");
}

#[tokio::test]
async fn test_delete_answer_row_removes_only_that_row() {
    let repo = LocalRepository::new();

    repo.save_validation_answer(&create_answer(1, 1, "a"))
        .await
        .unwrap();
    repo.save_validation_answer(&create_answer(1, 1, "b"))
        .await
        .unwrap();
    repo.save_validation_answer(&create_answer(1, 2, "c"))
        .await
        .unwrap();

    let removed = repo
        .delete_answers_by_questionnaire_and_row(QuestionnaireId::new(1), 1)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let remaining = repo
        .find_answers_by_questionnaire(QuestionnaireId::new(1))
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].row_id, 2);
}

#[tokio::test]
async fn test_delete_empty_answer_row_is_not_an_error() {
    let repo = LocalRepository::new();
    let removed = repo
        .delete_answers_by_questionnaire_and_row(QuestionnaireId::new(1), 1)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

// =========================================================
// Reference Tables
// =========================================================

#[tokio::test]
async fn test_reference_tables_start_empty() {
    let repo = LocalRepository::new();
    assert!(repo.list_validations().await.unwrap().is_empty());
    assert!(repo.list_validation_summaries().await.unwrap().is_empty());
    assert!(repo.list_validation_values().await.unwrap().is_empty());
    assert!(repo
        .list_validation_combination_results()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_seeded_reference_rows_are_returned() {
    let repo = LocalRepository::new();
    repo.insert_validation_impl(Validation {
        id: ValidationId::new(1),
        name: "Frequency".to_string(),
        validation_type: "SELECT".to_string(),
        weight: 5,
    });
    repo.insert_validation_summary_impl(ValidationSummary {
        id: 1,
        name: "User story".to_string(),
        weight: 1,
    });

    let validations = repo.list_validations().await.unwrap();
    assert_eq!(validations.len(), 1);
    assert_eq!(validations[0].validation_type, "SELECT");

    let summaries = repo.list_validation_summaries().await.unwrap();
    assert_eq!(summaries.len(), 1);
}

// =========================================================
// Concurrent Access
// =========================================================

#[tokio::test]
async fn test_concurrent_creates_assign_distinct_ids() {
    let repo = Arc::new(LocalRepository::new());

    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone
                .save_precondition(&FeaturePrecondition::new(format!("answer_{}", i)))
                .await
        }));
    }

    let mut ids = vec![];
    for handle in handles {
        let precondition = handle.await.unwrap().unwrap();
        ids.push(precondition.id.unwrap());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert_eq!(repo.precondition_count(), 10);
}

#[tokio::test]
async fn test_concurrent_updates_last_write_wins() {
    let repo = Arc::new(LocalRepository::new());

    let created = repo
        .save_precondition(&FeaturePrecondition::new("initial"))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone
                .save_precondition(&FeaturePrecondition {
                    id: Some(id),
                    answer: format!("update_{}", i),
                })
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // One of the writes won; the record is intact and has exactly one row
    let found = repo.find_precondition(id).await.unwrap().unwrap();
    assert!(found.answer.starts_with("update_"));
    assert_eq!(repo.precondition_count(), 1);
}
