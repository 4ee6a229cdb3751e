use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::collections::VecDeque;

/// 修复建议的有界 LRU 缓存
///
/// Keyed by the SHA-1 of the vulnerability label plus code excerpt. Capacity
/// is fixed at construction; inserting at capacity evicts the least recently
/// used entry, and a hit refreshes recency.
pub struct FixCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl FixCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// 缓存键：标签与摘录内容的哈希
    pub fn key(vulnerability: &str, code_excerpt: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(vulnerability.as_bytes());
        hasher.update(b"\0");
        hasher.update(code_excerpt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        let value = self.entries.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    pub fn insert(&mut self, key: String, value: String) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key.clone(), value);
            self.touch(&key);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_and_input_sensitive() {
        let a = FixCache::key("SQL Injection", "SELECT 1");
        let b = FixCache::key("SQL Injection", "SELECT 1");
        let c = FixCache::key("SQL Injection", "SELECT 2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let mut cache = FixCache::new(2);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b").as_deref(), Some("2"));
        assert_eq!(cache.get("c").as_deref(), Some("3"));
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = FixCache::new(2);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());

        // 访问 a 之后，b 成为最旧条目
        cache.get("a");
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.get("a").as_deref(), Some("1"));
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn reinsert_updates_value_without_growing() {
        let mut cache = FixCache::new(2);
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("a".to_string(), "updated".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut cache = FixCache::new(0);
        cache.insert("a".to_string(), "1".to_string());
        assert_eq!(cache.len(), 1);

        cache.insert("b".to_string(), "2".to_string());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
    }
}
