// Core algorithm exports
pub mod filters;
pub mod icebreakers;
pub mod resolver;
pub mod scoring;
pub mod teams;

pub use filters::{individual_blend, is_eligible, matched_required_skills};
pub use icebreakers::{generate as generate_icebreakers, MAX_ICEBREAKERS};
pub use resolver::{
    CreateOutcome, MatchNotifier, MatchResolver, MatchStore, ProfileAccessor, StoreError,
    SwipeError, SwipeOutcome, SwipeStore,
};
pub use scoring::{score, MAX_RAW_SCORE};
pub use teams::{TeamBuilder, TeamSearchResult, CANDIDATE_WINDOW, COMBINATION_CAP};
