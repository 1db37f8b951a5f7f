use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Category of relationship being sought. Drives factor weights,
/// directionality and eligibility filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "match_type", rename_all = "lowercase")]
pub enum MatchType {
    Mentor,
    Mentee,
    Cofounder,
    Teammate,
}

impl MatchType {
    /// The match type a candidate must be seeking to be eligible for a
    /// requester with this match type. Mentor and mentee pair with each
    /// other; cofounder and teammate pair with themselves.
    pub fn complementary(self) -> MatchType {
        match self {
            MatchType::Mentor => MatchType::Mentee,
            MatchType::Mentee => MatchType::Mentor,
            MatchType::Cofounder => MatchType::Cofounder,
            MatchType::Teammate => MatchType::Teammate,
        }
    }

    /// Mentor/mentee scoring is computed from the requester's perspective
    /// and is not symmetric under swapping the two profiles.
    pub fn is_directional(self) -> bool {
        matches!(self, MatchType::Mentor | MatchType::Mentee)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Mentor => "mentor",
            MatchType::Mentee => "mentee",
            MatchType::Cofounder => "cofounder",
            MatchType::Teammate => "teammate",
        }
    }
}

/// One-sided swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "swipe_action", rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Pass,
    SuperLike,
}

impl SwipeAction {
    /// Likes and super-likes count toward reciprocity; passes do not.
    pub fn expresses_interest(self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::SuperLike)
    }
}

/// Attendee role at the event. The ordering backs the mentor/mentee
/// experience-gap heuristic; speaker ranks with professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professional,
    Speaker,
    Organizer,
}

impl Role {
    pub fn experience_rank(self) -> u8 {
        match self {
            Role::Student => 1,
            Role::Professional | Role::Speaker => 2,
            Role::Organizer => 3,
        }
    }
}

/// Which kinds of matches a user has opted into.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeekingFlags {
    pub mentor: bool,
    pub mentee: bool,
    pub cofounder: bool,
    pub teammate: bool,
}

/// Immutable-for-the-request snapshot of a user's attributes, owned by
/// the profile directory and read-only to this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    pub role: Role,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub work_style: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub seeking: SeekingFlags,
}

impl Profile {
    pub fn skill_set(&self) -> HashSet<String> {
        normalized_set(&self.skills)
    }

    pub fn interest_set(&self) -> HashSet<String> {
        normalized_set(&self.interests)
    }

    pub fn goal_set(&self) -> Option<HashSet<String>> {
        self.goals.as_deref().map(normalized_set)
    }

    pub fn is_seeking(&self, match_type: MatchType) -> bool {
        match match_type {
            MatchType::Mentor => self.seeking.mentor,
            MatchType::Mentee => self.seeking.mentee,
            MatchType::Cofounder => self.seeking.cofounder,
            MatchType::Teammate => self.seeking.teammate,
        }
    }
}

/// Lowercased, trimmed, deduplicated view of a string list. All overlap
/// computations go through this so comparisons are case-insensitive.
pub fn normalized_set(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// One factor's contribution to a compatibility score, with the evidence
/// (e.g. the overlapping items) that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: String,
    pub points: u32,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Result of scoring a candidate against a requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Normalized total in 0..=100.
    pub total: u8,
    pub breakdown: Vec<FactorScore>,
}

/// Append-only record of a single swipe. Never mutated; a later swipe on
/// the same (actor, target, matchType) supersedes it for reciprocity
/// checks but the row is retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRecord {
    pub id: String,
    pub actor_id: String,
    pub target_id: String,
    pub action: SwipeAction,
    pub match_type: MatchType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Order-independent identity of a two-party relationship: sorted user
/// ids plus the match type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchKey {
    pub user_a: String,
    pub user_b: String,
    pub match_type: MatchType,
}

impl MatchKey {
    /// Build the canonical key for a pair, independent of which side
    /// initiated. The lexicographically smaller id is always `user_a`.
    pub fn canonical(first: &str, second: &str, match_type: MatchType) -> Self {
        let (user_a, user_b) = if first <= second {
            (first.to_string(), second.to_string())
        } else {
            (second.to_string(), first.to_string())
        };
        Self {
            user_a,
            user_b,
            match_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
}

/// Durable match record. At most one exists per canonical key; this core
/// creates it exactly once and never updates or deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub user_a: String,
    pub user_b: String,
    pub match_type: MatchType,
    pub status: MatchStatus,
    /// Score computed at commit time from the canonical `user_a`
    /// perspective; a CompatibilityScore is never persisted on its own.
    pub compatibility: CompatibilityScore,
    pub icebreakers: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Match {
    pub fn key(&self) -> MatchKey {
        MatchKey {
            user_a: self.user_a.clone(),
            user_b: self.user_b.clone(),
            match_type: self.match_type,
        }
    }
}

/// Event handed to the match notifier by the winner of the atomic create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCreatedEvent {
    pub match_id: String,
    pub user_a: String,
    pub user_b: String,
    pub match_type: MatchType,
    pub icebreakers: Vec<String>,
}

/// Member summary inside a team suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: String,
    pub display_name: String,
    /// Compatibility of this member to the requester.
    pub compatibility: u8,
    /// Required skills this member covers.
    pub matched_skills: Vec<String>,
}

/// Transient team formation result; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSuggestion {
    pub members: Vec<TeamMember>,
    /// Mean member-to-requester compatibility.
    pub total_compatibility: f64,
    /// Fraction of required skills covered by the team, 0..=1.
    pub skill_coverage: f64,
    /// Ranking value: totalCompatibility + 10 * skillCoverage.
    pub team_score: f64,
}

/// Candidate listing filter passed to the profile directory.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// Candidates must be seeking this match type.
    pub seeking: MatchType,
    pub exclude_user_ids: Vec<String>,
    pub limit: usize,
}
