//! Read-only validation reference tables.
//!
//! Validations, summaries, selectable values, and combination results are
//! seeded reference data: no create or update path exists, only bulk
//! retrieval in store-defined order.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Validation, ValidationCombinationResult, ValidationSummary, ValidationValue};

/// Repository trait for the read-only validation reference tables.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ValidationReferenceRepository: Send + Sync {
    /// Fetch every validation rule.
    async fn list_validations(&self) -> RepositoryResult<Vec<Validation>>;

    /// Fetch every validation summary.
    async fn list_validation_summaries(&self) -> RepositoryResult<Vec<ValidationSummary>>;

    /// Fetch every selectable validation value.
    async fn list_validation_values(&self) -> RepositoryResult<Vec<ValidationValue>>;

    /// Fetch every combination result, combinations attached.
    async fn list_validation_combination_results(
        &self,
    ) -> RepositoryResult<Vec<ValidationCombinationResult>>;
}
