use crate::models::Profile;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier profile snapshot cache: moka in-process L1, Redis L2 shared
/// across instances.
///
/// Strictly a read accelerator for the profile directory. Swipe and
/// match state never goes through here; the resolver's correctness
/// rests on the stores alone. Stale snapshots age out by TTL, there is
/// no explicit invalidation.
pub struct ProfileCache {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl ProfileCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1 = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1,
            ttl_secs,
        })
    }

    /// Look up a cached profile snapshot (L1 first, then L2). Returns
    /// None on a miss or on any decode problem.
    pub async fn get_profile(&self, user_id: &str) -> Option<Profile> {
        let key = Self::profile_key(user_id);

        if let Some(bytes) = self.l1.get(&key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return serde_json::from_slice(&bytes).ok();
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut *conn)
            .await
            .ok()?;
        drop(conn);

        let json = value?;
        tracing::trace!("L2 cache hit: {}", key);
        self.l1.insert(key, json.as_bytes().to_vec()).await;
        serde_json::from_str(&json).ok()
    }

    /// Cache a profile snapshot in both tiers with the configured TTL
    pub async fn put_profile(&self, profile: &Profile) -> Result<(), CacheError> {
        let key = Self::profile_key(&profile.user_id);
        let json = serde_json::to_string(profile)?;

        self.l1.insert(key.clone(), json.as_bytes().to_vec()).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(&key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;

        tracing::trace!("Cached profile: {}", key);
        Ok(())
    }

    fn profile_key(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SeekingFlags};

    #[test]
    fn test_profile_key_format() {
        assert_eq!(ProfileCache::profile_key("user123"), "profile:user123");
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_profile_round_trip() {
        let cache = ProfileCache::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let profile = Profile {
            user_id: "cache_test".to_string(),
            display_name: "Cache Test".to_string(),
            skills: vec!["rust".to_string()],
            interests: vec![],
            goals: None,
            role: Role::Student,
            personality: None,
            work_style: None,
            location: None,
            company: None,
            college: None,
            seeking: SeekingFlags::default(),
        };

        cache.put_profile(&profile).await.unwrap();
        let cached = cache.get_profile("cache_test").await.unwrap();
        assert_eq!(cached.user_id, "cache_test");
    }
}
