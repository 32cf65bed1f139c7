//! Feature precondition repository trait.
//!
//! Preconditions are the one entity with real lifecycle logic: they are
//! created with a store-assigned identifier and updated in place. There is
//! no delete operation.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{FeaturePrecondition, PreconditionId};

/// Repository trait for feature precondition operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PreconditionRepository: Send + Sync {
    /// Check if the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist a precondition.
    ///
    /// Assigns an identifier when the record carries none; otherwise
    /// overwrites the existing record with that identifier.
    ///
    /// # Returns
    /// * `Ok(FeaturePrecondition)` - The persisted record, identifier set
    /// * `Err(RepositoryError::NotFound)` - Update targeted a missing id
    /// * `Err(RepositoryError)` - If the store rejects the write
    async fn save_precondition(
        &self,
        precondition: &FeaturePrecondition,
    ) -> RepositoryResult<FeaturePrecondition>;

    /// Fetch a precondition by identifier.
    ///
    /// # Returns
    /// * `Ok(Some(FeaturePrecondition))` - The record, if present
    /// * `Ok(None)` - No precondition with that identifier
    /// * `Err(RepositoryError)` - If the operation fails
    async fn find_precondition(
        &self,
        id: PreconditionId,
    ) -> RepositoryResult<Option<FeaturePrecondition>>;
}
