//! Property tests for the precondition workflow and response mapping.

#![cfg(feature = "http-server")]

use proptest::prelude::*;

use qval_rust::api::{FeaturePrecondition, PreconditionId};
use qval_rust::db::repositories::LocalRepository;
use qval_rust::db::services;
use qval_rust::http::dto::FeaturePreconditionResponse;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// For every answer string, create returns a record with that answer
    /// and a fresh identifier.
    #[test]
    fn create_preserves_answer_and_assigns_fresh_id(answers in prop::collection::vec(".*", 1..8)) {
        runtime().block_on(async {
            let repo = LocalRepository::new();
            let mut seen_ids = Vec::new();

            for answer in &answers {
                let created = services::create_precondition(&repo, answer).await.unwrap();
                prop_assert_eq!(&created.answer, answer);

                let id = created.id.expect("create must assign an identifier");
                prop_assert!(!seen_ids.contains(&id));
                seen_ids.push(id);
            }
            Ok(())
        })?;
    }

    /// Updating an existing record keeps its identifier and replaces the
    /// answer; a follow-up lookup reflects the new value.
    #[test]
    fn update_replaces_answer_in_place(first in ".*", second in ".*") {
        runtime().block_on(async {
            let repo = LocalRepository::new();

            let created = services::create_precondition(&repo, &first).await.unwrap();
            let id = created.id.unwrap();

            let updated = services::update_precondition(&repo, id, &second).await.unwrap();
            prop_assert_eq!(updated.id, Some(id));
            prop_assert_eq!(&updated.answer, &second);

            let found = repo_find(&repo, id).await;
            prop_assert_eq!(&found.answer, &second);
            Ok(())
        })?;
    }

    /// The response projection is injective: entities differing in id or
    /// answer map to distinct responses.
    #[test]
    fn response_mapping_is_injective(
        id_a in 1..10_000i32,
        id_b in 1..10_000i32,
        answer_a in ".*",
        answer_b in ".*",
    ) {
        let entity_a = FeaturePrecondition {
            id: Some(PreconditionId::new(id_a)),
            answer: answer_a.clone(),
        };
        let entity_b = FeaturePrecondition {
            id: Some(PreconditionId::new(id_b)),
            answer: answer_b.clone(),
        };

        let response_a = FeaturePreconditionResponse::from(entity_a.clone());
        let response_b = FeaturePreconditionResponse::from(entity_b.clone());

        prop_assert_eq!(response_a.id, id_a);
        prop_assert_eq!(&response_a.answer, &answer_a);
        if entity_a != entity_b {
            prop_assert_ne!(response_a, response_b);
        }
    }
}

async fn repo_find(repo: &LocalRepository, id: PreconditionId) -> FeaturePrecondition {
    use qval_rust::db::repository::PreconditionRepository;
    repo.find_precondition(id).await.unwrap().unwrap()
}
