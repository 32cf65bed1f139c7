//! Public API surface for the questionnaire backend.
//!
//! This file consolidates the identifier newtypes and re-exports the
//! domain entities. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::models::precondition::FeaturePrecondition;
pub use crate::models::questionnaire::Questionnaire;
pub use crate::models::validation::Validation;
pub use crate::models::validation::ValidationAnswer;
pub use crate::models::validation::ValidationCombination;
pub use crate::models::validation::ValidationCombinationResult;
pub use crate::models::validation::ValidationSummary;
pub use crate::models::validation::ValidationValue;

use serde::{Deserialize, Serialize};

/// Feature precondition identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PreconditionId(pub i32);

/// Questionnaire identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionnaireId(pub i32);

/// Validation rule identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidationId(pub i32);

/// Validation answer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnswerId(pub i32);

impl PreconditionId {
    pub fn new(value: i32) -> Self {
        PreconditionId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl QuestionnaireId {
    pub fn new(value: i32) -> Self {
        QuestionnaireId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl ValidationId {
    pub fn new(value: i32) -> Self {
        ValidationId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl AnswerId {
    pub fn new(value: i32) -> Self {
        AnswerId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for PreconditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for QuestionnaireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ValidationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for AnswerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PreconditionId> for i32 {
    fn from(id: PreconditionId) -> Self {
        id.0
    }
}

impl From<QuestionnaireId> for i32 {
    fn from(id: QuestionnaireId) -> Self {
        id.0
    }
}
