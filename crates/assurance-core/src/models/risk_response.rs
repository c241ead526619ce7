use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::ResponseType;

/// A treatment proposed by the suggestion provider. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProposedResponse {
    pub response_type: ResponseType,
    pub rationale: Option<String>,
}

/// The single declared treatment of a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResponse {
    pub risk_id: String,
    pub response_type: ResponseType,
    pub rationale: Option<String>,
    pub ai_proposed: Option<AiProposedResponse>,
    pub updated_at: DateTime<Utc>,
}
