//! Property-Based Tests for the Visualization API
//!
//! For any valid create body the API SHALL:
//! - assign a fresh non-empty id and equal `created_at`/`updated_at`
//! - return the same record from a follow-up GET
//! - apply partial updates without touching unsent fields
//! - report a list count equal to creates minus deletes

use axum::http::{Method, StatusCode};
use nowyouseeme_api::UpdateVisualizationRequest;
use nowyouseeme_core::Visualization;
use nowyouseeme_test_utils::assertions::assert_modified_from;
use nowyouseeme_test_utils::generators::{arb_create_payload, arb_update_payload};
use proptest::prelude::*;
use tokio::runtime::Runtime;

#[path = "support/app.rs"]
mod test_app_support;
use test_app_support::TestApp;

const VISUALIZATIONS: &str = "/api/v1/visualizations";

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn fail(e: String) -> TestCaseError {
    TestCaseError::fail(e)
}

async fn create(app: &TestApp, body: &serde_json::Value) -> Result<Visualization, TestCaseError> {
    let response = app.send_json(Method::POST, VISUALIZATIONS, body).await.map_err(fail)?;
    prop_assert_eq!(response.status, StatusCode::CREATED);
    serde_json::from_value(response.json().map_err(fail)?)
        .map_err(|e| TestCaseError::fail(e.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_create_then_get_returns_same_record(payload in arb_create_payload()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new().map_err(fail)?;
            let created = create(&app, &payload).await?;

            prop_assert!(!created.id.is_empty());
            prop_assert_eq!(created.created_at, created.updated_at);
            prop_assert_eq!(Some(created.agent_name.as_str()), payload["agent_name"].as_str());

            let response = app
                .send(Method::GET, &format!("{}/{}", VISUALIZATIONS, created.id), None)
                .await
                .map_err(fail)?;
            prop_assert_eq!(response.status, StatusCode::OK);
            let fetched: Visualization = serde_json::from_value(response.json().map_err(fail)?)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(fetched, created);
            Ok(())
        })?;
    }

    #[test]
    fn prop_update_matches_local_merge(
        create_body in arb_create_payload(),
        update_body in arb_update_payload(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new().map_err(fail)?;
            let created = create(&app, &create_body).await?;

            let response = app
                .send_json(Method::PUT, &format!("{}/{}", VISUALIZATIONS, created.id), &update_body)
                .await
                .map_err(fail)?;
            prop_assert_eq!(response.status, StatusCode::OK);
            let updated: Visualization = serde_json::from_value(response.json().map_err(fail)?)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let request: UpdateVisualizationRequest = serde_json::from_value(update_body)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let expected = request.apply_to(created.clone());

            prop_assert_eq!(&updated.agent_name, &expected.agent_name);
            prop_assert_eq!(&updated.description, &expected.description);
            prop_assert_eq!(&updated.image_data, &expected.image_data);
            prop_assert_eq!(&updated.metadata, &expected.metadata);
            assert_modified_from(&created, &updated);
            Ok(())
        })?;
    }

    #[test]
    fn prop_list_count_tracks_creates_and_deletes(
        payloads in prop::collection::vec(arb_create_payload(), 1..8),
        delete_mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = TestApp::new().map_err(fail)?;

            let mut live = 0usize;
            for (payload, delete) in payloads.iter().zip(delete_mask.iter()) {
                let created = create(&app, payload).await?;
                live += 1;
                if *delete {
                    let response = app
                        .send(Method::DELETE, &format!("{}/{}", VISUALIZATIONS, created.id), None)
                        .await
                        .map_err(fail)?;
                    prop_assert_eq!(response.status, StatusCode::OK);
                    live -= 1;

                    let response = app
                        .send(Method::GET, &format!("{}/{}", VISUALIZATIONS, created.id), None)
                        .await
                        .map_err(fail)?;
                    prop_assert_eq!(response.status, StatusCode::NOT_FOUND);
                }
            }

            let body = app
                .send(Method::GET, VISUALIZATIONS, None)
                .await
                .map_err(fail)?
                .json()
                .map_err(fail)?;
            prop_assert_eq!(body["count"].as_u64(), Some(live as u64));
            prop_assert_eq!(
                body["visualizations"].as_array().map(|items| items.len()),
                Some(live)
            );
            Ok(())
        })?;
    }
}
