use crate::core::{icebreakers, scoring};
use crate::models::{
    CandidateFilter, Match, MatchCreatedEvent, MatchKey, MatchStatus, MatchType, Profile,
    SwipeAction, SwipeRecord,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the external stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by swipe resolution. Losing the atomic match create is
/// deliberately not represented here; it resolves to the winner's result.
#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Read access to profile snapshots, owned by the platform directory.
#[async_trait]
pub trait ProfileAccessor: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Profile, StoreError>;

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>, StoreError>;
}

/// Append-only swipe ledger. Rows are never mutated; the latest row per
/// directed (actor, target, matchType) is authoritative for reciprocity.
#[async_trait]
pub trait SwipeStore: Send + Sync {
    async fn append_swipe(&self, record: &SwipeRecord) -> Result<(), StoreError>;

    /// Latest swipe from `actor_id` toward `target_id` under the match
    /// type, if any.
    async fn find_latest_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        match_type: MatchType,
    ) -> Result<Option<SwipeRecord>, StoreError>;

    /// Full swipe history for a user (newest first), for audit.
    async fn list_swipes(
        &self,
        user_id: &str,
        match_type: Option<MatchType>,
    ) -> Result<Vec<SwipeRecord>, StoreError>;
}

/// Outcome of a conditional match create.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// True when this invocation created the record; false when a match
    /// with the same canonical key already existed.
    pub created: bool,
    pub match_record: Match,
}

/// Durable match store. The conditional create is the sole authority on
/// match existence and must be atomic at the store layer.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Create the match unless one already exists for its canonical key.
    /// Exactly one concurrent caller per key observes `created = true`;
    /// all others receive the pre-existing record.
    async fn create_match_if_absent(&self, candidate: Match) -> Result<CreateOutcome, StoreError>;

    async fn get_match(&self, key: &MatchKey) -> Result<Option<Match>, StoreError>;
}

/// Receives the match-created event; delivery (push, points, analytics)
/// happens downstream.
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn match_created(&self, event: &MatchCreatedEvent) -> Result<(), StoreError>;
}

/// Result of recording a swipe.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub swipe_id: String,
    pub matched: bool,
    pub match_id: Option<String>,
}

/// Swipe ledger orchestration and reciprocal-match resolution.
///
/// Stateless across requests: all durable state lives behind the store
/// ports, and the only mutual exclusion required is the conditional
/// create inside the match store.
#[derive(Clone)]
pub struct MatchResolver {
    profiles: Arc<dyn ProfileAccessor>,
    swipes: Arc<dyn SwipeStore>,
    matches: Arc<dyn MatchStore>,
    notifier: Arc<dyn MatchNotifier>,
}

impl MatchResolver {
    pub fn new(
        profiles: Arc<dyn ProfileAccessor>,
        swipes: Arc<dyn SwipeStore>,
        matches: Arc<dyn MatchStore>,
        notifier: Arc<dyn MatchNotifier>,
    ) -> Self {
        Self {
            profiles,
            swipes,
            matches,
            notifier,
        }
    }

    /// Record a swipe and resolve reciprocity.
    ///
    /// The match commit is attempted only after the ledger write
    /// succeeds, so a failed request never leaves a half-created match.
    pub async fn record_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        action: SwipeAction,
        match_type: MatchType,
    ) -> Result<SwipeOutcome, SwipeError> {
        if actor_id.is_empty() || target_id.is_empty() {
            return Err(SwipeError::Validation("user ids must be non-empty".into()));
        }
        if actor_id == target_id {
            return Err(SwipeError::Validation("cannot swipe on yourself".into()));
        }

        let record = SwipeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            action,
            match_type,
            created_at: chrono::Utc::now(),
        };
        self.swipes.append_swipe(&record).await?;

        tracing::debug!(
            "recorded swipe {}: {} -> {} ({:?}, {:?})",
            record.id,
            actor_id,
            target_id,
            action,
            match_type
        );

        if !action.expresses_interest() {
            return Ok(SwipeOutcome {
                swipe_id: record.id,
                matched: false,
                match_id: None,
            });
        }

        // Reciprocity: the latest swipe in the opposite direction wins,
        // so a like followed by a pass withdraws the earlier interest
        let reciprocal = self
            .swipes
            .find_latest_swipe(target_id, actor_id, match_type)
            .await?;

        match reciprocal {
            Some(back) if back.action.expresses_interest() => {
                let committed = self.commit_match(actor_id, target_id, match_type).await?;
                Ok(SwipeOutcome {
                    swipe_id: record.id,
                    matched: true,
                    match_id: Some(committed.id),
                })
            }
            _ => Ok(SwipeOutcome {
                swipe_id: record.id,
                matched: false,
                match_id: None,
            }),
        }
    }

    /// Swipe history for a user, newest first.
    pub async fn swipe_history(
        &self,
        user_id: &str,
        match_type: Option<MatchType>,
    ) -> Result<Vec<SwipeRecord>, SwipeError> {
        if user_id.is_empty() {
            return Err(SwipeError::Validation("user id must be non-empty".into()));
        }
        Ok(self.swipes.list_swipes(user_id, match_type).await?)
    }

    /// Commit exactly one match for the canonical pair key.
    ///
    /// Two near-simultaneous invocations (one per swipe direction) may
    /// both reach this point; the store's conditional create picks the
    /// single winner, and the loser adopts the existing record without
    /// erroring. The payload is built from canonical-order profiles so
    /// both racers compute identical icebreakers and score.
    async fn commit_match(
        &self,
        actor_id: &str,
        target_id: &str,
        match_type: MatchType,
    ) -> Result<Match, SwipeError> {
        let key = MatchKey::canonical(actor_id, target_id, match_type);

        let profile_a = self.fetch_profile(&key.user_a).await?;
        let profile_b = self.fetch_profile(&key.user_b).await?;

        let compatibility = scoring::score(&profile_a, &profile_b, match_type);
        let icebreakers = icebreakers::generate(&profile_a, &profile_b, match_type);

        let candidate = Match {
            id: uuid::Uuid::new_v4().to_string(),
            user_a: key.user_a.clone(),
            user_b: key.user_b.clone(),
            match_type,
            status: MatchStatus::Matched,
            compatibility,
            icebreakers,
            created_at: chrono::Utc::now(),
        };

        let outcome = self.matches.create_match_if_absent(candidate).await?;

        if outcome.created {
            tracing::info!(
                "match {} created for {} + {} ({:?})",
                outcome.match_record.id,
                outcome.match_record.user_a,
                outcome.match_record.user_b,
                match_type
            );

            // Only the winner of the atomic create emits the event, so
            // downstream delivery fires once per canonical key. Delivery
            // is best-effort and never fails the swipe.
            let event = MatchCreatedEvent {
                match_id: outcome.match_record.id.clone(),
                user_a: outcome.match_record.user_a.clone(),
                user_b: outcome.match_record.user_b.clone(),
                match_type,
                icebreakers: outcome.match_record.icebreakers.clone(),
            };
            if let Err(e) = self.notifier.match_created(&event).await {
                tracing::warn!("match created but notification failed: {}", e);
            }
        } else {
            tracing::debug!(
                "match for {} + {} ({:?}) already exists as {}",
                outcome.match_record.user_a,
                outcome.match_record.user_b,
                match_type,
                outcome.match_record.id
            );
        }

        Ok(outcome.match_record)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, SwipeError> {
        self.profiles.get_profile(user_id).await.map_err(|e| match e {
            StoreError::NotFound(msg) => SwipeError::NotFound(msg),
            other => SwipeError::Store(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_error_taxonomy_display() {
        let validation = SwipeError::Validation("cannot swipe on yourself".into());
        assert!(validation.to_string().contains("validation"));

        let store: SwipeError = StoreError::Unavailable("connection refused".into()).into();
        assert!(store.to_string().contains("store"));
    }
}
