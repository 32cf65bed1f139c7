//! Data Transfer Objects for the HTTP API.
//!
//! Request DTOs carry explicit `validate()` functions that run at the
//! inbound boundary before anything reaches the service layer; the core
//! never sees malformed input. Response DTOs are pure projections of the
//! domain entities.

use serde::{Deserialize, Serialize};

use crate::api::{
    AnswerId, FeaturePrecondition, PreconditionId, Questionnaire, QuestionnaireId,
    ValidationAnswer, ValidationId,
};

// Reference entities serialize as-is; no separate response shape needed.
pub use crate::api::{Validation, ValidationCombinationResult, ValidationSummary, ValidationValue};

/// Request body for creating or updating a feature precondition.
///
/// The answer may be empty: the data-entry UI creates blank preconditions
/// and fills them in as the user types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePreconditionRequest {
    pub answer: String,
}

/// Response shape for a feature precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePreconditionResponse {
    pub id: i32,
    pub answer: String,
}

impl From<FeaturePrecondition> for FeaturePreconditionResponse {
    fn from(entity: FeaturePrecondition) -> Self {
        Self {
            id: entity.id.map(|id| id.value()).unwrap_or_default(),
            answer: entity.answer,
        }
    }
}

/// Request body for saving a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireRequest {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
}

impl QuestionnaireRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if let Some(id) = self.id {
            if id <= 0 {
                return Err("id must be positive".to_string());
            }
        }
        Ok(())
    }
}

impl From<QuestionnaireRequest> for Questionnaire {
    fn from(request: QuestionnaireRequest) -> Self {
        Questionnaire {
            id: request.id.map(QuestionnaireId::new),
            name: request.name,
            validation_answers: Vec::new(),
        }
    }
}

/// Response shape for a questionnaire with its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub id: i32,
    pub name: String,
    pub validation_answers: Vec<ValidationAnswerResponse>,
}

impl From<Questionnaire> for QuestionnaireResponse {
    fn from(entity: Questionnaire) -> Self {
        Self {
            id: entity.id.map(|id| id.value()).unwrap_or_default(),
            name: entity.name,
            validation_answers: entity
                .validation_answers
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Request body for saving a validation answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationAnswerRequest {
    #[serde(default)]
    pub id: Option<i32>,
    pub row_id: i32,
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: String,
    pub questionnaire_id: i32,
    pub validation_id: i32,
}

impl ValidationAnswerRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err("id must be positive".to_string());
            }
        }
        if self.row_id <= 0 {
            return Err("row_id must be positive".to_string());
        }
        if self.answer_type.trim().is_empty() {
            return Err("type must not be empty".to_string());
        }
        if self.questionnaire_id <= 0 {
            return Err("questionnaire_id must be positive".to_string());
        }
        if self.validation_id <= 0 {
            return Err("validation_id must be positive".to_string());
        }
        Ok(())
    }
}

impl From<ValidationAnswerRequest> for ValidationAnswer {
    fn from(request: ValidationAnswerRequest) -> Self {
        ValidationAnswer {
            id: request.id.map(AnswerId::new),
            row_id: request.row_id,
            answer: request.answer,
            answer_type: request.answer_type,
            questionnaire_id: QuestionnaireId::new(request.questionnaire_id),
            validation_id: ValidationId::new(request.validation_id),
        }
    }
}

/// Response shape for a validation answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationAnswerResponse {
    pub id: i32,
    pub row_id: i32,
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: String,
    pub questionnaire_id: i32,
    pub validation_id: i32,
}

impl From<ValidationAnswer> for ValidationAnswerResponse {
    fn from(entity: ValidationAnswer) -> Self {
        Self {
            id: entity.id.map(|id| id.value()).unwrap_or_default(),
            row_id: entity.row_id,
            answer: entity.answer,
            answer_type: entity.answer_type,
            questionnaire_id: entity.questionnaire_id.value(),
            validation_id: entity.validation_id.value(),
        }
    }
}

/// Query parameters for listing answers of a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswersQuery {
    pub questionnaire_id: i32,
}

/// Query parameters for deleting one answer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnswersQuery {
    pub questionnaire_id: i32,
    pub row_id: i32,
}

/// Response for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Number of rows removed
    pub deleted: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
