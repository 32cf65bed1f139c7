use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    feature_preconditions, questionnaires, validation_answers, validation_combination_results,
    validation_combinations, validation_summaries, validation_values, validations,
};
use crate::api::{
    AnswerId, FeaturePrecondition, PreconditionId, Questionnaire, QuestionnaireId, Validation,
    ValidationAnswer, ValidationCombination, ValidationCombinationResult, ValidationId,
    ValidationSummary, ValidationValue,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feature_preconditions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is used only for database operations
pub struct PreconditionRow {
    pub id: i32,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feature_preconditions)]
pub struct NewPreconditionRow {
    pub answer: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questionnaires)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct QuestionnaireRow {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questionnaires)]
pub struct NewQuestionnaireRow {
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_answers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct ValidationAnswerRow {
    pub id: i32,
    pub row_id: i32,
    pub answer: String,
    pub answer_type: String,
    pub questionnaire_id: i32,
    pub validation_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = validation_answers)]
pub struct NewValidationAnswerRow {
    pub row_id: i32,
    pub answer: String,
    pub answer_type: String,
    pub questionnaire_id: i32,
    pub validation_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ValidationRow {
    pub id: i32,
    pub name: String,
    pub validation_type: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_summaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ValidationSummaryRow {
    pub id: i32,
    pub name: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_values)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ValidationValueRow {
    pub id: i32,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_combination_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CombinationResultRow {
    pub id: i32,
    pub result: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_combinations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CombinationRow {
    pub id: i32,
    pub combination_result_id: i32,
    pub validation_id: i32,
    pub value: String,
}

impl From<PreconditionRow> for FeaturePrecondition {
    fn from(row: PreconditionRow) -> Self {
        FeaturePrecondition {
            id: Some(PreconditionId::new(row.id)),
            answer: row.answer,
        }
    }
}

impl From<ValidationAnswerRow> for ValidationAnswer {
    fn from(row: ValidationAnswerRow) -> Self {
        ValidationAnswer {
            id: Some(AnswerId::new(row.id)),
            row_id: row.row_id,
            answer: row.answer,
            answer_type: row.answer_type,
            questionnaire_id: QuestionnaireId::new(row.questionnaire_id),
            validation_id: ValidationId::new(row.validation_id),
        }
    }
}

impl QuestionnaireRow {
    pub fn into_questionnaire(self, answers: Vec<ValidationAnswer>) -> Questionnaire {
        Questionnaire {
            id: Some(QuestionnaireId::new(self.id)),
            name: self.name,
            validation_answers: answers,
        }
    }
}

impl From<ValidationRow> for Validation {
    fn from(row: ValidationRow) -> Self {
        Validation {
            id: ValidationId::new(row.id),
            name: row.name,
            validation_type: row.validation_type,
            weight: row.weight,
        }
    }
}

impl From<ValidationSummaryRow> for ValidationSummary {
    fn from(row: ValidationSummaryRow) -> Self {
        ValidationSummary {
            id: row.id,
            name: row.name,
            weight: row.weight,
        }
    }
}

impl From<ValidationValueRow> for ValidationValue {
    fn from(row: ValidationValueRow) -> Self {
        ValidationValue {
            id: row.id,
            value: row.value,
            label: row.label,
        }
    }
}

impl From<CombinationRow> for ValidationCombination {
    fn from(row: CombinationRow) -> Self {
        ValidationCombination {
            id: row.id,
            validation_id: ValidationId::new(row.validation_id),
            value: row.value,
        }
    }
}

impl CombinationResultRow {
    pub fn into_result(self, combinations: Vec<ValidationCombination>) -> ValidationCombinationResult {
        ValidationCombinationResult {
            id: self.id,
            result: self.result,
            combinations,
        }
    }
}
