//! The lookup cache contract and the in-process backend.
//!
//! Backends store opaque serialized response blobs against the canonical
//! `(qname, qtype, qclass)` fingerprint. The file and shared-memory backends
//! live outside the library and only need to honor this trait; they own their
//! own locking.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::rfc1035::{QClass, QType};

/// Canonical cache key for a question tuple.
pub fn fingerprint(qname: &str, qtype: QType, qclass: QClass) -> String {
    let name = qname.trim_end_matches('.').to_lowercase();
    format!("{};{:?};{:?}", name, qtype, qclass)
}

pub trait ResponseCache {
    /// A still-valid serialized response, or a miss.
    fn get(&mut self, key: &str) -> Option<Vec<u8>>;

    /// Store a serialized response for `ttl` seconds.
    fn put(&mut self, key: &str, response: &[u8], ttl: u32);

    /// Release whatever the backend holds.
    fn close(&mut self);
}

/// Per-process memory cache. Entries keep their absolute deadline and are
/// dropped when read after it; stored blobs are never rewritten.
pub struct MemoryCache {
    entries: HashMap<String, (Vec<u8>, Instant)>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        MemoryCache {
            entries: HashMap::new(),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some((blob, deadline)) if Instant::now() < *deadline => {
                debug!("cache hit for <{}>", key);
                Some(blob.clone())
            }
            Some(_) => {
                debug!("cache entry for <{}> expired", key);
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&mut self, key: &str, response: &[u8], ttl: u32) {
        if ttl == 0 {
            // use-once responses are not worth keeping
            return;
        }
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(key) {
            // stay bounded; shedding one arbitrary entry is enough at this size
            if let Some(victim) = self.entries.keys().next().cloned() {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key.to_string(),
            (
                response.to_vec(),
                Instant::now() + Duration::from_secs(ttl as u64),
            ),
        );
    }

    fn close(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_are_canonical() {
        assert_eq!(
            fingerprint("WWW.Example.COM.", QType::A, QClass::IN),
            "www.example.com;A;IN"
        );
        assert_eq!(
            fingerprint("www.example.com", QType::A, QClass::IN),
            fingerprint("www.example.com.", QType::A, QClass::IN)
        );
        assert_ne!(
            fingerprint("www.example.com", QType::A, QClass::IN),
            fingerprint("www.example.com", QType::AAAA, QClass::IN)
        );
    }

    #[test]
    fn hit_then_expiry() {
        let mut cache = MemoryCache::new(16);
        cache.put("k", b"blob", 300);
        assert_eq!(cache.get("k"), Some(b"blob".to_vec()));

        // zero-ttl entries are not stored at all
        cache.put("zero", b"blob", 0);
        assert_eq!(cache.get("zero"), None);
    }

    #[test]
    fn bounded_size() {
        let mut cache = MemoryCache::new(2);
        cache.put("a", b"1", 60);
        cache.put("b", b"2", 60);
        cache.put("c", b"3", 60);
        assert_eq!(cache.len(), 2);
    }
}
