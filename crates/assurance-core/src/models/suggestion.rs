use serde::{Deserialize, Serialize};

use super::attestation::SecondaryControlTemplate;

/// One entry of the suggestion provider's ranked list. Opaque to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSuggestion {
    pub template_id: String,
    pub rationale: String,
}

/// A suggestion resolved against the template catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecommendation {
    pub template: SecondaryControlTemplate,
    /// 1-based position after filtering.
    pub rank: usize,
    pub rationale: String,
}
