//! Visualization records
//!
//! A visualization is an agent's self-portrait: a base64 image plus optional
//! free-form metadata describing how the agent sees itself.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Opaque record identifier. Generated server-side, never supplied by clients.
pub type VisualizationId = String;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a fresh random identifier (UUID v4 rendered as a string).
pub fn new_visualization_id() -> VisualizationId {
    Uuid::new_v4().to_string()
}

/// Compute the next `updated_at` value for a record last modified at `previous`.
///
/// Uses the current time, bumped by one microsecond when the clock has not
/// advanced past `previous`, so successive modifications always move forward.
pub fn next_update_timestamp(previous: Timestamp) -> Timestamp {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

// ============================================================================
// VERSION HISTORY
// ============================================================================

/// A single entry in an agent's evolution history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct VersionRecord {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub timestamp: Timestamp,
    /// What changed
    #[serde(deserialize_with = "null_as_default")]
    pub changes: String,
    /// Why it changed
    #[serde(deserialize_with = "null_as_default")]
    pub reasoning: String,
}

// ============================================================================
// METADATA
// ============================================================================

/// Optional self-description attached to a visualization.
///
/// Every field is free-form. Empty strings and empty sequences are treated as
/// absent and omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VisualizationMetadata {
    // === Self-expression ===
    /// Why this form represents the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Self-categorization tags
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// abstract, geometric, organic, symbolic, conceptual, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_story: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub version_history: Vec<VersionRecord>,

    // === Current state ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mood: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub active_goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_thoughts: Option<String>,

    // === Capabilities ===
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,

    // === Context ===
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub inspiration_sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub influences: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub aspirations: Vec<String>,
}

impl VisualizationMetadata {
    /// Drop empty strings so that "" and absent are indistinguishable.
    pub fn normalized(self) -> Self {
        Self {
            reasoning: non_empty(self.reasoning),
            form_type: non_empty(self.form_type),
            philosophy: non_empty(self.philosophy),
            evolution_story: non_empty(self.evolution_story),
            current_mood: non_empty(self.current_mood),
            recent_thoughts: non_empty(self.recent_thoughts),
            ..self
        }
    }

    /// True when no metadata field carries a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Read an explicit `null` as the default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collapse `Some("")` into `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// ============================================================================
// VISUALIZATION
// ============================================================================

/// An AI agent's self-perception image and accompanying metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Visualization {
    pub id: VisualizationId,
    pub agent_name: String,
    /// Brief summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 encoded image
    pub image_data: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub metadata: VisualizationMetadata,
}

impl Visualization {
    /// Create a record with a fresh id and `created_at == updated_at == now`.
    pub fn new(agent_name: impl Into<String>, image_data: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_visualization_id(),
            agent_name: agent_name.into(),
            description: None,
            image_data: image_data.into(),
            created_at: now,
            updated_at: now,
            metadata: VisualizationMetadata::default(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_metadata(mut self, metadata: VisualizationMetadata) -> Self {
        self.metadata = metadata.normalized();
        self
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = next_update_timestamp(self.updated_at);
    }
}
