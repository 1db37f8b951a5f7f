use crate::models::domain::{CompatibilityScore, SwipeRecord, TeamSuggestion};
use serde::{Deserialize, Serialize};

/// Response for the compatibility score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub requester_id: String,
    pub candidate_id: String,
    pub score: CompatibilityScore,
}

/// Response for the team suggestion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTeamsResponse {
    pub suggestions: Vec<TeamSuggestion>,
    pub candidates_considered: usize,
}

/// Response for the record swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSwipeResponse {
    pub swipe_id: String,
    pub matched: bool,
    pub match_id: Option<String>,
}

/// Response for the swipe history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeHistoryResponse {
    pub user_id: String,
    pub swipes: Vec<SwipeRecord>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
