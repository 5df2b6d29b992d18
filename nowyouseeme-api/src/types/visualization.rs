//! Visualization-related API types

use nowyouseeme_core::{Visualization, VisualizationId, VisualizationMetadata};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::validation::{Validate, ValidateNonEmpty};

/// Request to create a new visualization.
///
/// Metadata fields sit at the top level of the JSON object, next to
/// `agent_name` and `image_data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateVisualizationRequest {
    /// Name of the agent (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 encoded image (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(flatten)]
    pub metadata: VisualizationMetadata,
}

impl CreateVisualizationRequest {
    pub fn new(agent_name: impl Into<String>, image_data: impl Into<String>) -> Self {
        Self {
            agent_name: Some(agent_name.into()),
            image_data: Some(image_data.into()),
            ..Default::default()
        }
    }

    /// Build the record to store: fresh id, `created_at == updated_at == now`.
    ///
    /// Callers validate first; missing required fields become empty strings.
    pub fn into_visualization(self) -> Visualization {
        Visualization::new(
            self.agent_name.unwrap_or_default(),
            self.image_data.unwrap_or_default(),
        )
        .with_description(self.description)
        .with_metadata(self.metadata)
    }
}

impl Validate for CreateVisualizationRequest {
    fn validate(&self) -> ApiResult<()> {
        self.agent_name.validate_non_empty("agent_name")?;
        self.image_data.validate_non_empty("image_data")?;
        Ok(())
    }
}

/// Request to update an existing visualization.
///
/// Every field is optional. A non-empty string or a non-empty list replaces
/// the stored value; anything else leaves it as it is, so a field can never
/// be cleared through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateVisualizationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(flatten)]
    pub metadata: VisualizationMetadata,
}

impl UpdateVisualizationRequest {
    /// Merge this request into `existing` and advance `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_to(self, mut existing: Visualization) -> Visualization {
        if let Some(agent_name) = self.agent_name.filter(|s| !s.is_empty()) {
            existing.agent_name = agent_name;
        }
        merge_text(&mut existing.description, self.description);
        if let Some(image_data) = self.image_data.filter(|s| !s.is_empty()) {
            existing.image_data = image_data;
        }
        merge_metadata(&mut existing.metadata, self.metadata);
        existing.touch();
        existing
    }
}

fn merge_text(target: &mut Option<String>, patch: Option<String>) {
    if let Some(value) = patch.filter(|s| !s.is_empty()) {
        *target = Some(value);
    }
}

fn merge_list<T>(target: &mut Vec<T>, patch: Vec<T>) {
    if !patch.is_empty() {
        *target = patch;
    }
}

fn merge_metadata(target: &mut VisualizationMetadata, patch: VisualizationMetadata) {
    merge_text(&mut target.reasoning, patch.reasoning);
    merge_list(&mut target.tags, patch.tags);
    merge_text(&mut target.form_type, patch.form_type);
    merge_text(&mut target.philosophy, patch.philosophy);
    merge_text(&mut target.evolution_story, patch.evolution_story);
    merge_list(&mut target.version_history, patch.version_history);

    merge_text(&mut target.current_mood, patch.current_mood);
    merge_list(&mut target.active_goals, patch.active_goals);
    merge_text(&mut target.recent_thoughts, patch.recent_thoughts);

    merge_list(&mut target.capabilities, patch.capabilities);
    merge_list(&mut target.specializations, patch.specializations);
    merge_list(&mut target.limitations, patch.limitations);

    merge_list(&mut target.inspiration_sources, patch.inspiration_sources);
    merge_list(&mut target.influences, patch.influences);
    merge_list(&mut target.aspirations, patch.aspirations);
}

/// Response containing every stored visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListVisualizationsResponse {
    /// Newest first
    pub visualizations: Vec<Visualization>,
    /// Number of entries in `visualizations`
    pub count: usize,
}

impl ListVisualizationsResponse {
    /// Sort newest first (ties by id) and count.
    pub fn from_records(mut visualizations: Vec<Visualization>) -> Self {
        visualizations.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let count = visualizations.len();
        Self {
            visualizations,
            count,
        }
    }
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteVisualizationResponse {
    pub message: String,
    pub id: VisualizationId,
}

impl DeleteVisualizationResponse {
    pub fn deleted(id: VisualizationId) -> Self {
        Self {
            message: "Visualization deleted successfully".to_string(),
            id,
        }
    }
}
