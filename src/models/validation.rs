//! Validation entities: answers plus the read-only reference tables.

use serde::{Deserialize, Serialize};

use crate::api::{AnswerId, QuestionnaireId, ValidationId};

/// A user-submitted value tied to a questionnaire row and validation rule.
///
/// `answer_type` mirrors the type discriminator of the validation rule the
/// answer belongs to; it is an opaque string at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationAnswer {
    pub id: Option<AnswerId>,
    pub row_id: i32,
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: String,
    pub questionnaire_id: QuestionnaireId,
    pub validation_id: ValidationId,
}

/// A validation rule column in the data-entry grid.
///
/// Read-only in this backend; rows are seeded reference data. Clients sort
/// by `weight` to order the grid columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub id: ValidationId,
    pub name: String,
    #[serde(rename = "type")]
    pub validation_type: String,
    pub weight: i32,
}

/// Read-only summary row displayed above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub id: i32,
    pub name: String,
    pub weight: i32,
}

/// A selectable option for SELECT-type validations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationValue {
    pub id: i32,
    pub value: String,
    pub label: String,
}

/// One expected (validation, value) pair inside a combination result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCombination {
    pub id: i32,
    pub validation_id: ValidationId,
    pub value: String,
}

/// The result text produced when a row matches all of its combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCombinationResult {
    pub id: i32,
    pub result: String,
    #[serde(default)]
    pub combinations: Vec<ValidationCombination>,
}
