//! Huddle Algo - matching core for the Huddle event platform
//!
//! This library pairs event attendees (mentors/mentees, cofounders,
//! teammates) using weighted compatibility scoring, a bounded team
//! formation search and a bidirectional swipe protocol that resolves
//! reciprocal interest into exactly one durable match per pair.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{score, MatchResolver, TeamBuilder, CANDIDATE_WINDOW, COMBINATION_CAP};
pub use models::{
    CompatibilityScore, Match, MatchKey, MatchType, Profile, SwipeAction, SwipeRecord,
    TeamSuggestion,
};
