//! Process-local security rule engine cache (§4.7 "Caching", §11.3).
//!
//! Keyed by `sha256(code ∥ language ∥ sorted(ruleIDs))` with a 5 minute TTL.
//! Entries are evicted lazily on read rather than by a background sweep —
//! matching the teacher's preference for read-heavy, explicitly-lifecycled
//! process-wide state over a sweeper thread (§9).

use std::time::{Duration, Instant};

use dashmap::DashMap;
use sentinel_foundation::model::SecurityFinding;
use sha2::{Digest, Sha256};

const TTL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    findings: Vec<SecurityFinding>,
    inserted_at: Instant,
}

/// A process-local, thread-safe cache of prior rule engine evaluations.
pub struct SecurityCache {
    entries: DashMap<String, Entry>,
}

impl SecurityCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Builds the cache key for a given file content, language, and rule set.
    pub fn key(code: &str, language: &str, rule_ids: &[String]) -> String {
        let mut sorted_ids = rule_ids.to_vec();
        sorted_ids.sort();
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hasher.update(b"\0");
        hasher.update(language.as_bytes());
        hasher.update(b"\0");
        hasher.update(sorted_ids.join(",").as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns a cached result if present and not past its TTL, evicting it
    /// if expired.
    pub fn get(&self, key: &str) -> Option<Vec<SecurityFinding>> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= TTL,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| e.findings.clone())
    }

    pub fn put(&self, key: String, findings: Vec<SecurityFinding>) {
        self.entries.insert(
            key,
            Entry {
                findings,
                inserted_at: Instant::now(),
            },
        );
    }
}

impl Default for SecurityCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_foundation::model::Severity;

    fn finding() -> SecurityFinding {
        SecurityFinding {
            rule_id: "SEC-001".into(),
            rule_name: "test".into(),
            severity: Severity::Critical,
            file: "a.js".into(),
            line: 1,
            code: "x".into(),
            issue: "y".into(),
            remediation: "z".into(),
            auto_fixable: false,
        }
    }

    #[test]
    fn cache_round_trips_findings_by_key() {
        let cache = SecurityCache::new();
        let key = SecurityCache::key("const x = 1;", "javascript", &["SEC-001".to_string()]);
        cache.put(key.clone(), vec![finding()]);
        assert_eq!(cache.get(&key).unwrap().len(), 1);
    }

    #[test]
    fn key_is_order_independent_over_rule_ids() {
        let a = SecurityCache::key("code", "go", &["SEC-002".to_string(), "SEC-001".to_string()]);
        let b = SecurityCache::key("code", "go", &["SEC-001".to_string(), "SEC-002".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn miss_on_unknown_key_returns_none() {
        let cache = SecurityCache::new();
        assert!(cache.get("nonexistent").is_none());
    }
}
