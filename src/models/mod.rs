//! Domain entities for the questionnaire backend.
//!
//! These are plain data types shared between the repository backends and
//! the HTTP layer. Entities that the store creates carry an optional
//! identifier: `None` until the repository has assigned one.

pub mod precondition;
pub mod questionnaire;
pub mod validation;

pub use precondition::FeaturePrecondition;
pub use questionnaire::Questionnaire;
pub use validation::{
    Validation, ValidationAnswer, ValidationCombination, ValidationCombinationResult,
    ValidationSummary, ValidationValue,
};
