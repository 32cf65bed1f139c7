//! Questionnaire entity.

use serde::{Deserialize, Serialize};

use crate::api::QuestionnaireId;
use crate::models::validation::ValidationAnswer;

/// A questionnaire with its validation answers.
///
/// Answers are a one-to-many association; each answer back-references the
/// questionnaire identifier. The list is populated on retrieval and is not
/// written through `save_questionnaire` (answers have their own save path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: Option<QuestionnaireId>,
    pub name: String,
    #[serde(default)]
    pub validation_answers: Vec<ValidationAnswer>,
}

impl Questionnaire {
    /// Create an unpersisted questionnaire with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            validation_answers: Vec::new(),
        }
    }
}
