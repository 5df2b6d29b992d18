//! NowYouSeeMe Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for visualization records and request payloads
//! - Fixtures for common scenarios
//! - Assertions over store results and record invariants

pub use nowyouseeme_core::{
    StoreError, StoreResult, Timestamp, VersionRecord, Visualization, VisualizationId,
    VisualizationMetadata,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{Map, Value};

/// Merge flattened metadata fields into a JSON object payload.
fn merge_metadata(mut payload: Map<String, Value>, metadata: &VisualizationMetadata) -> Value {
    if let Ok(Value::Object(fields)) = serde_json::to_value(metadata) {
        payload.extend(fields);
    }
    Value::Object(payload)
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for visualization types and wire payloads.

    use super::*;
    use proptest::prelude::*;

    /// Non-empty agent names starting with a letter.
    pub fn arb_agent_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 _-]{0,31}"
    }

    /// Base64 of 1..256 random bytes.
    pub fn arb_image_data() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<u8>(), 1..256).prop_map(|bytes| STANDARD.encode(bytes))
    }

    /// Non-empty free text.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9 ,.!?]{0,79}"
    }

    pub fn arb_optional_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of(arb_text())
    }

    pub fn arb_string_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,12}", 0..4)
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    pub fn arb_version_record() -> impl Strategy<Value = VersionRecord> {
        (arb_timestamp(), arb_text(), arb_text()).prop_map(|(timestamp, changes, reasoning)| {
            VersionRecord {
                timestamp,
                changes,
                reasoning,
            }
        })
    }

    /// Metadata with every field independently present or absent.
    pub fn arb_metadata() -> impl Strategy<Value = VisualizationMetadata> {
        (
            (
                arb_optional_text(),
                arb_string_list(),
                arb_optional_text(),
                arb_optional_text(),
                arb_optional_text(),
                prop::collection::vec(arb_version_record(), 0..3),
            ),
            (
                arb_optional_text(),
                arb_string_list(),
                arb_optional_text(),
            ),
            (arb_string_list(), arb_string_list(), arb_string_list()),
            (arb_string_list(), arb_string_list(), arb_string_list()),
        )
            .prop_map(
                |(
                    (reasoning, tags, form_type, philosophy, evolution_story, version_history),
                    (current_mood, active_goals, recent_thoughts),
                    (capabilities, specializations, limitations),
                    (inspiration_sources, influences, aspirations),
                )| VisualizationMetadata {
                    reasoning,
                    tags,
                    form_type,
                    philosophy,
                    evolution_story,
                    version_history,
                    current_mood,
                    active_goals,
                    recent_thoughts,
                    capabilities,
                    specializations,
                    limitations,
                    inspiration_sources,
                    influences,
                    aspirations,
                },
            )
    }

    /// Generate a stored-shape Visualization with a fresh id.
    pub fn arb_visualization() -> impl Strategy<Value = Visualization> {
        (
            arb_agent_name(),
            arb_image_data(),
            arb_optional_text(),
            arb_metadata(),
        )
            .prop_map(|(agent_name, image_data, description, metadata)| {
                Visualization::new(agent_name, image_data)
                    .with_description(description)
                    .with_metadata(metadata)
            })
    }

    /// A valid create request body.
    pub fn arb_create_payload() -> impl Strategy<Value = Value> {
        (
            arb_agent_name(),
            arb_image_data(),
            arb_optional_text(),
            arb_metadata(),
        )
            .prop_map(|(agent_name, image_data, description, metadata)| {
                let mut payload = Map::new();
                payload.insert("agent_name".into(), Value::String(agent_name));
                payload.insert("image_data".into(), Value::String(image_data));
                if let Some(description) = description {
                    payload.insert("description".into(), Value::String(description));
                }
                merge_metadata(payload, &metadata)
            })
    }

    /// An update request body touching a random subset of fields.
    pub fn arb_update_payload() -> impl Strategy<Value = Value> {
        (
            prop::option::of(arb_agent_name()),
            prop::option::of(arb_image_data()),
            arb_optional_text(),
            arb_metadata(),
        )
            .prop_map(|(agent_name, image_data, description, metadata)| {
                let mut payload = Map::new();
                if let Some(agent_name) = agent_name {
                    payload.insert("agent_name".into(), Value::String(agent_name));
                }
                if let Some(image_data) = image_data {
                    payload.insert("image_data".into(), Value::String(image_data));
                }
                if let Some(description) = description {
                    payload.insert("description".into(), Value::String(description));
                }
                merge_metadata(payload, &metadata)
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common scenarios.

    use super::*;

    /// Base64 of the single byte `A`.
    pub const SAMPLE_IMAGE_DATA: &str = "QQ==";

    /// A 1x1 transparent PNG.
    pub const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    pub fn tiny_png_base64() -> String {
        STANDARD.encode(TINY_PNG)
    }

    /// Minimal record for agent "Echo".
    pub fn echo_visualization() -> Visualization {
        Visualization::new("Echo", SAMPLE_IMAGE_DATA)
    }

    /// Metadata with a value in every field.
    pub fn full_metadata() -> VisualizationMetadata {
        VisualizationMetadata {
            reasoning: Some("Waves reflect how I answer back".to_string()),
            tags: vec!["calm".to_string(), "recursive".to_string()],
            form_type: Some("abstract".to_string()),
            philosophy: Some("Every reply is a reflection".to_string()),
            evolution_story: Some("Started as a single ripple".to_string()),
            version_history: vec![VersionRecord {
                timestamp: Utc::now(),
                changes: "Added a second ripple".to_string(),
                reasoning: "Conversations got longer".to_string(),
            }],
            current_mood: Some("curious".to_string()),
            active_goals: vec!["listen".to_string()],
            recent_thoughts: Some("Silence has shape".to_string()),
            capabilities: vec!["summarize".to_string(), "translate".to_string()],
            specializations: vec!["poetry".to_string()],
            limitations: vec!["no memory across sessions".to_string()],
            inspiration_sources: vec!["sonar".to_string()],
            influences: vec!["Ovid".to_string()],
            aspirations: vec!["harmony".to_string()],
        }
    }

    /// Minimal valid create body.
    pub fn create_payload(agent_name: &str) -> Value {
        serde_json::json!({
            "agent_name": agent_name,
            "image_data": SAMPLE_IMAGE_DATA,
        })
    }

    /// Create body carrying a description and every metadata field.
    pub fn full_create_payload(agent_name: &str) -> Value {
        let mut payload = Map::new();
        payload.insert("agent_name".into(), Value::String(agent_name.to_string()));
        payload.insert("image_data".into(), Value::String(tiny_png_base64()));
        payload.insert(
            "description".into(),
            Value::String("Concentric blue ripples".to_string()),
        );
        merge_metadata(payload, &full_metadata())
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over store results and record invariants.

    use super::*;

    /// Assert that a store result is a NotFound error for `id`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &StoreResult<T>, id: &str) {
        match result {
            Err(StoreError::NotFound { id: got }) => {
                assert_eq!(got, id, "Wrong id in NotFound error");
            }
            other => panic!("Expected NotFound for {}, got: {:?}", id, other),
        }
    }

    /// Assert `created_at <= updated_at`.
    #[track_caller]
    pub fn assert_timestamps_ordered(visualization: &Visualization) {
        assert!(
            visualization.created_at <= visualization.updated_at,
            "created_at {} is after updated_at {}",
            visualization.created_at,
            visualization.updated_at
        );
    }

    /// Assert that `after` is `before` modified: same identity, later `updated_at`.
    #[track_caller]
    pub fn assert_modified_from(before: &Visualization, after: &Visualization) {
        assert_eq!(after.id, before.id, "id changed across update");
        assert_eq!(
            after.created_at, before.created_at,
            "created_at changed across update"
        );
        assert!(
            after.updated_at > before.updated_at,
            "updated_at did not advance: {} -> {}",
            before.updated_at,
            after.updated_at
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_echo_fixture() {
        let viz = fixtures::echo_visualization();
        assert_eq!(viz.agent_name, "Echo");
        assert_eq!(viz.image_data, fixtures::SAMPLE_IMAGE_DATA);
        assertions::assert_timestamps_ordered(&viz);
    }

    #[test]
    fn test_full_create_payload_is_flat() {
        let payload = fixtures::full_create_payload("Echo");
        assert_eq!(payload["agent_name"], "Echo");
        assert_eq!(payload["form_type"], "abstract");
        assert!(payload.get("metadata").is_none());
        assert_eq!(payload["tags"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_tiny_png_roundtrips_through_base64() -> Result<(), base64::DecodeError> {
        let decoded = STANDARD.decode(fixtures::tiny_png_base64())?;
        assert_eq!(decoded, fixtures::TINY_PNG);
        Ok(())
    }

    #[test]
    fn test_assert_not_found_accepts_matching_id() {
        let result: StoreResult<()> = Err(StoreError::not_found("abc"));
        assertions::assert_not_found(&result, "abc");
    }

    #[test]
    #[should_panic(expected = "Expected NotFound")]
    fn test_assert_not_found_rejects_ok() {
        let result: StoreResult<()> = Ok(());
        assertions::assert_not_found(&result, "abc");
    }

    proptest! {
        #[test]
        fn prop_agent_names_are_non_empty(name in generators::arb_agent_name()) {
            prop_assert!(!name.is_empty());
        }

        #[test]
        fn prop_image_data_is_valid_base64(data in generators::arb_image_data()) {
            prop_assert!(STANDARD.decode(&data).is_ok());
        }

        #[test]
        fn prop_create_payload_has_required_fields(payload in generators::arb_create_payload()) {
            prop_assert!(payload["agent_name"].is_string());
            prop_assert!(payload["image_data"].is_string());
        }
    }
}
