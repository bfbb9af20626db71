//! Bookkeeping for watched requests between `requestWillBeSent` and the end of loading

use std::collections::HashMap;

use tracing::debug;

#[derive(Debug)]
struct Entry {
    url: String,
    loader_id: String,
    seq: u64,
}

/// Watched requests still waiting for `loadingFinished` or `loadingFailed`.
///
/// Entries also leave when the main frame commits a new document, since the old
/// document's requests never report back, and the oldest entry is evicted once
/// `capacity` is reached.
#[derive(Debug)]
pub struct InFlightRequests {
    entries: HashMap<String, Entry>,
    capacity: usize,
    next_seq: u64,
}

impl InFlightRequests {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Start tracking a request. A redirect reuses the request id and replaces the entry.
    pub fn track(&mut self, request_id: &str, url: &str, loader_id: &str) {
        if !self.entries.contains_key(request_id) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            request_id.to_string(),
            Entry {
                url: url.to_string(),
                loader_id: loader_id.to_string(),
                seq,
            },
        );
    }

    /// Stop tracking a request, returning its URL when it was watched.
    pub fn finish(&mut self, request_id: &str) -> Option<String> {
        self.entries.remove(request_id).map(|entry| entry.url)
    }

    /// Forget requests issued by any document other than `loader_id`.
    pub fn navigated(&mut self, loader_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.loader_id == loader_id);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!(dropped, "Dropped requests of the previous document");
        }
        dropped
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            debug!(request_id = %id, "Evicting oldest in-flight request");
            self.entries.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_request_yields_its_url_once() {
        let mut requests = InFlightRequests::new(8);
        requests.track("r1", "https://api.example/core/listing", "doc-1");

        assert_eq!(
            requests.finish("r1").as_deref(),
            Some("https://api.example/core/listing")
        );
        assert_eq!(requests.finish("r1"), None);
        assert_eq!(requests.len(), 0);
    }

    #[test]
    fn unknown_request_is_ignored() {
        let mut requests = InFlightRequests::new(8);
        assert_eq!(requests.finish("never-tracked"), None);
    }

    #[test]
    fn navigation_drops_requests_of_the_old_document() {
        let mut requests = InFlightRequests::new(8);
        requests.track("r1", "https://api.example/core/a", "doc-1");
        requests.track("r2", "https://api.example/core/b", "doc-1");
        requests.track("r3", "https://api.example/core/c", "doc-2");

        assert_eq!(requests.navigated("doc-2"), 2);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests.finish("r1"), None);
        assert!(requests.finish("r3").is_some());
    }

    #[test]
    fn capacity_evicts_oldest_entry() {
        let mut requests = InFlightRequests::new(2);
        requests.track("r1", "https://api.example/core/a", "doc-1");
        requests.track("r2", "https://api.example/core/b", "doc-1");
        requests.track("r3", "https://api.example/core/c", "doc-1");

        assert_eq!(requests.len(), 2);
        assert_eq!(requests.finish("r1"), None);
        assert!(requests.finish("r2").is_some());
        assert!(requests.finish("r3").is_some());
    }

    #[test]
    fn redirect_replaces_entry_without_eviction() {
        let mut requests = InFlightRequests::new(2);
        requests.track("r1", "https://api.example/core/a", "doc-1");
        requests.track("r2", "https://api.example/core/b", "doc-1");
        requests.track("r2", "https://api.example/core/b2", "doc-1");

        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests.finish("r2").as_deref(),
            Some("https://api.example/core/b2")
        );
        assert!(requests.finish("r1").is_some());
    }
}
