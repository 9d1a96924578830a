use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Built once per refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    pub matches: Vec<Value>,
    pub standings: Option<Value>,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub payload: Arc<MatchPayload>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    Empty,
    Fresh(Arc<MatchPayload>),
    Expired(Arc<MatchPayload>),
}

/// Single-slot cache holding the last complete payload.
///
/// The slot may be empty at any time (cold start, restarted instance). Writers
/// swap in a whole entry, so readers see either the previous payload or the new
/// one.
#[derive(Debug)]
pub struct MatchCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
}

impl MatchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Starts warm, as if `payload` had been fetched at `fetched_at`.
    pub fn seeded(ttl: Duration, payload: MatchPayload, fetched_at: DateTime<Utc>) -> Self {
        let cache = Self::new(ttl);
        cache.store(payload, fetched_at);
        cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn lookup(&self, now: DateTime<Utc>) -> CacheStatus {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            None => CacheStatus::Empty,
            Some(entry) if now - entry.fetched_at < self.ttl => {
                CacheStatus::Fresh(entry.payload.clone())
            }
            Some(entry) => CacheStatus::Expired(entry.payload.clone()),
        }
    }

    pub fn store(&self, payload: MatchPayload, fetched_at: DateTime<Utc>) -> Arc<MatchPayload> {
        let payload = Arc::new(payload);
        let entry = CacheEntry {
            payload: payload.clone(),
            fetched_at,
        };
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(tag: &str) -> MatchPayload {
        MatchPayload {
            matches: vec![json!({ "id": tag })],
            standings: None,
            fetched_at: "2026-06-11T18:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn starts_empty() {
        let cache = MatchCache::new(Duration::minutes(30));
        assert_eq!(cache.lookup(Utc::now()), CacheStatus::Empty);
    }

    #[test]
    fn fresh_within_ttl_and_expired_at_boundary() {
        let fetched_at = Utc::now();
        let cache = MatchCache::seeded(Duration::minutes(30), payload("a"), fetched_at);

        let within = fetched_at + Duration::minutes(29);
        assert!(matches!(cache.lookup(within), CacheStatus::Fresh(_)));

        let boundary = fetched_at + Duration::minutes(30);
        assert!(matches!(cache.lookup(boundary), CacheStatus::Expired(_)));
    }

    #[test]
    fn store_replaces_whole_entry() {
        let now = Utc::now();
        let cache = MatchCache::seeded(Duration::minutes(30), payload("old"), now - Duration::hours(2));

        cache.store(payload("new"), now);

        match cache.lookup(now) {
            CacheStatus::Fresh(p) => assert_eq!(*p, payload("new")),
            other => panic!("expected fresh entry, got {:?}", other),
        }
    }

    #[test]
    fn payload_serializes_with_camel_case_timestamp() {
        let value = serde_json::to_value(payload("a")).unwrap();
        assert_eq!(
            value,
            json!({
                "matches": [{ "id": "a" }],
                "standings": null,
                "fetchedAt": "2026-06-11T18:00:00.000Z",
            })
        );
    }
}
