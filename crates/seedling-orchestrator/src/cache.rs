//! In-memory response cache with lazy TTL expiry
//!
//! Keys are `"{operation}:{sha256(params)}"`. Values are held as JSON so one
//! cache serves every reply type; reads deserialize back into the caller's
//! type. Expired entries are removed when they are read.

use seedling_llm::{AiError, OperationKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;

/// One cached reply
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// Hashed key
    pub key: String,
    /// Cached value
    pub value: T,
    /// When the entry was stored (ms since epoch)
    pub created_at: u64,
    /// Pre-hash key material: operation name and serialized parameters
    pub source_key: String,
}

impl<T> CacheEntry<T> {
    /// Whether the entry is older than `ttl_millis` at `now`
    pub fn is_expired(&self, now: u64, ttl_millis: u64) -> bool {
        now.saturating_sub(self.created_at) >= ttl_millis
    }
}

/// Deterministic cache key for an operation and its parameters
///
/// Returns `(key, source_key)`.
pub fn cache_key<P: Serialize + ?Sized>(
    operation: OperationKind,
    params: &P,
) -> Result<(String, String), AiError> {
    let serialized = serde_json::to_string(params)
        .map_err(|e| AiError::InvalidRequest(format!("Parameters are not serializable: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(operation.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(serialized.as_bytes());
    let digest = hex::encode(hasher.finalize());

    Ok((
        format!("{}:{}", operation.as_str(), digest),
        format!("{}:{}", operation.as_str(), serialized),
    ))
}

/// TTL cache owned by one orchestrator
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry<Value>>,
    ttl_millis: u64,
}

impl ResponseCache {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_millis: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Look up `key`, dropping it if it has expired or no longer decodes as `T`
    pub fn get<T: DeserializeOwned>(&mut self, key: &str, now: u64) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(now, self.ttl_millis) {
            self.entries.remove(key);
            return None;
        }
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(_) => {
                self.entries.remove(key);
                None
            }
        }
    }

    /// Store `value` under `key`
    pub fn insert<T: Serialize>(&mut self, key: String, source_key: String, value: &T, now: u64) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                value,
                created_at: now,
                source_key,
            },
        );
    }

    /// Remove every expired entry, returning how many were removed
    pub fn prune_expired(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_millis;
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included until pruned
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOUR: u64 = 3_600_000;

    #[test]
    fn test_key_is_deterministic() {
        let (a, _) = cache_key(OperationKind::FindCenters, &json!({"text": "x"})).unwrap();
        let (b, _) = cache_key(OperationKind::FindCenters, &json!({"text": "x"})).unwrap();
        let (c, _) = cache_key(OperationKind::CheckUnity, &json!({"text": "x"})).unwrap();
        let (d, _) = cache_key(OperationKind::FindCenters, &json!({"text": "y"})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.starts_with("find-centers:"));
        assert_eq!(a.len(), "find-centers:".len() + 64);
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = ResponseCache::new(Duration::from_secs(24 * 3600));
        cache.insert("k".into(), "src".into(), &vec![1, 2, 3], 0);
        assert_eq!(cache.get::<Vec<i32>>("k", 23 * HOUR), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_expired_entry_is_removed_on_read() {
        let mut cache = ResponseCache::new(Duration::from_secs(24 * 3600));
        cache.insert("k".into(), "src".into(), &"v", 0);
        assert_eq!(cache.get::<String>("k", 24 * HOUR), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unbounded_ttl_never_expires() {
        let mut cache = ResponseCache::new(Duration::from_secs(u64::MAX));
        cache.insert("k".into(), "src".into(), &"v", 0);
        assert_eq!(cache.get::<String>("k", u64::MAX - 1), Some("v".to_string()));
    }

    #[test]
    fn test_type_mismatch_is_a_miss() {
        let mut cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("k".into(), "src".into(), &"text", 0);
        assert_eq!(cache.get::<u32>("k", 1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_prune_expired() {
        let mut cache = ResponseCache::new(Duration::from_secs(3600));
        cache.insert("old".into(), "a".into(), &1, 0);
        cache.insert("new".into(), "b".into(), &2, HOUR / 2);
        assert_eq!(cache.prune_expired(HOUR), 1);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
