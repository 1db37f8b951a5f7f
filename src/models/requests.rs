use crate::models::{MatchType, SwipeAction};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to score a single candidate against a requester
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[validate(length(min = 1))]
    pub requester_id: String,
    #[validate(length(min = 1))]
    pub candidate_id: String,
    pub match_type: MatchType,
}

/// Request to suggest teams for a requester
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTeamsRequest {
    #[validate(length(min = 1))]
    pub requester_id: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Requested total team size including the requester.
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_team_size")]
    pub team_size: usize,
    pub match_type: MatchType,
}

fn default_team_size() -> usize {
    2
}

/// Request to record a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordSwipeRequest {
    #[validate(length(min = 1))]
    pub actor_id: String,
    #[validate(length(min = 1))]
    pub target_id: String,
    pub action: SwipeAction,
    pub match_type: MatchType,
}

/// Query parameters for the swipe history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeHistoryQuery {
    pub user_id: String,
    #[serde(default)]
    pub match_type: Option<MatchType>,
}
