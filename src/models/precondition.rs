//! Feature precondition entity.

use serde::{Deserialize, Serialize};

use crate::api::PreconditionId;

/// A stored answer value gating feature availability.
///
/// The identifier is assigned by the store on creation and is immutable
/// once assigned. The answer is free text and may be empty (the data-entry
/// UI creates blank preconditions and fills them in later), but it is
/// never absent for a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePrecondition {
    pub id: Option<PreconditionId>,
    pub answer: String,
}

impl FeaturePrecondition {
    /// Create an unpersisted precondition with the given answer.
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            id: None,
            answer: answer.into(),
        }
    }
}
