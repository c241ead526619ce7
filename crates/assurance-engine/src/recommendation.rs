//! Resolves the suggestion provider's ranked template ids against the catalog.
//!
//! Suggestions are opaque: they are filtered and ordered, never scored.

use rustc_hash::{FxHashMap, FxHashSet};

use assurance_core::models::{SecondaryControlTemplate, TemplateRecommendation, TemplateSuggestion};

/// Keep provider order, drop unknown ids, keep the first of any duplicates.
/// Ranks are 1-based after filtering.
pub fn recommend_templates(
    catalog: &[SecondaryControlTemplate],
    suggestions: &[TemplateSuggestion],
) -> Vec<TemplateRecommendation> {
    let by_id: FxHashMap<&str, &SecondaryControlTemplate> =
        catalog.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut seen = FxHashSet::default();

    let mut recommendations = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        let Some(template) = by_id.get(suggestion.template_id.as_str()) else {
            tracing::debug!(template_id = %suggestion.template_id, "dropping suggestion for unknown template");
            continue;
        };
        if !seen.insert(suggestion.template_id.as_str()) {
            continue;
        }
        recommendations.push(TemplateRecommendation {
            template: (*template).clone(),
            rank: recommendations.len() + 1,
            rationale: suggestion.rationale.clone(),
        });
    }
    recommendations
}
