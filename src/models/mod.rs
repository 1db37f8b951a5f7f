// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalized_set, CandidateFilter, CompatibilityScore, FactorScore, Match, MatchCreatedEvent,
    MatchKey, MatchStatus, MatchType, Profile, Role, SeekingFlags, SwipeAction, SwipeRecord,
    TeamMember, TeamSuggestion,
};
pub use requests::{RecordSwipeRequest, ScoreRequest, SuggestTeamsRequest, SwipeHistoryQuery};
pub use responses::{
    ErrorResponse, HealthResponse, RecordSwipeResponse, ScoreResponse, SuggestTeamsResponse,
    SwipeHistoryResponse,
};
