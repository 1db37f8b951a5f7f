//! In-memory implementations of the store ports.
//!
//! Used by the integration and race tests, and handy for running the
//! service locally without Postgres or a profile directory. The match
//! map sits behind a single mutex, so create-if-absent is atomic within
//! the process, the same guarantee the unique constraint provides in
//! Postgres.

use crate::core::resolver::{
    CreateOutcome, MatchNotifier, MatchStore, ProfileAccessor, StoreError, SwipeStore,
};
use crate::models::{
    CandidateFilter, Match, MatchCreatedEvent, MatchKey, MatchType, Profile, SwipeRecord,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Fixed set of profile snapshots
pub struct InMemoryProfiles {
    profiles: HashMap<String, Profile>,
}

impl InMemoryProfiles {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.user_id.clone(), p))
                .collect(),
        }
    }
}

#[async_trait]
impl ProfileAccessor for InMemoryProfiles {
    async fn get_profile(&self, user_id: &str) -> Result<Profile, StoreError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .profiles
            .values()
            .filter(|p| p.is_seeking(filter.seeking))
            .filter(|p| !filter.exclude_user_ids.contains(&p.user_id))
            .take(filter.limit)
            .cloned()
            .collect())
    }
}

/// Append-only swipe ledger backed by a Vec
#[derive(Default)]
pub struct InMemorySwipes {
    rows: Mutex<Vec<SwipeRecord>>,
}

impl InMemorySwipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows retained, including superseded swipes
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl SwipeStore for InMemorySwipes {
    async fn append_swipe(&self, record: &SwipeRecord) -> Result<(), StoreError> {
        self.rows.lock().await.push(record.clone());
        Ok(())
    }

    async fn find_latest_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        match_type: MatchType,
    ) -> Result<Option<SwipeRecord>, StoreError> {
        // Appends are in arrival order, so the last matching row is the
        // latest swipe
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .find(|r| {
                r.actor_id == actor_id && r.target_id == target_id && r.match_type == match_type
            })
            .cloned())
    }

    async fn list_swipes(
        &self,
        user_id: &str,
        match_type: Option<MatchType>,
    ) -> Result<Vec<SwipeRecord>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .filter(|r| r.actor_id == user_id)
            .filter(|r| match_type.map_or(true, |mt| r.match_type == mt))
            .cloned()
            .collect())
    }
}

/// Match store keyed by canonical pair key
#[derive(Default)]
pub struct InMemoryMatches {
    rows: Mutex<HashMap<MatchKey, Match>>,
}

impl InMemoryMatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct matches committed
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatches {
    async fn create_match_if_absent(&self, candidate: Match) -> Result<CreateOutcome, StoreError> {
        let mut rows = self.rows.lock().await;
        match rows.entry(candidate.key()) {
            std::collections::hash_map::Entry::Occupied(existing) => Ok(CreateOutcome {
                created: false,
                match_record: existing.get().clone(),
            }),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(candidate.clone());
                Ok(CreateOutcome {
                    created: true,
                    match_record: candidate,
                })
            }
        }
    }

    async fn get_match(&self, key: &MatchKey) -> Result<Option<Match>, StoreError> {
        Ok(self.rows.lock().await.get(key).cloned())
    }
}

/// Notifier that records every event it receives, for asserting
/// exactly-once emission
#[derive(Default)]
pub struct CountingNotifier {
    events: Mutex<Vec<MatchCreatedEvent>>,
}

impl CountingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<MatchCreatedEvent> {
        self.events.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.events.lock().await.len()
    }
}

#[async_trait]
impl MatchNotifier for CountingNotifier {
    async fn match_created(&self, event: &MatchCreatedEvent) -> Result<(), StoreError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}
