use std::sync::Arc;

use consign_core_types::{EntityId, SellerRecord};
use dashmap::DashMap;

/// Shared mapping from listing identifier to the latest observed seller record.
///
/// Grows for the lifetime of the owning context; entries are replaced, never evicted.
#[derive(Clone, Debug, Default)]
pub struct RecordCache {
    records: Arc<DashMap<EntityId, SellerRecord>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Returns the record that was replaced, if any.
    pub fn upsert(&self, id: EntityId, record: SellerRecord) -> Option<SellerRecord> {
        self.records.insert(id, record)
    }

    pub fn get(&self, id: &EntityId) -> Option<SellerRecord> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_previous_record() {
        let cache = RecordCache::new();
        let id = EntityId::parse("L1").unwrap();
        let older = SellerRecord {
            email: Some("old@b.com".into()),
            ..SellerRecord::default()
        };
        let newer = SellerRecord {
            email: Some("new@b.com".into()),
            ..SellerRecord::default()
        };

        assert!(cache.upsert(id.clone(), older.clone()).is_none());
        assert_eq!(cache.upsert(id.clone(), newer.clone()), Some(older));
        assert_eq!(cache.get(&id), Some(newer));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_storage() {
        let cache = RecordCache::new();
        let view = cache.clone();
        cache.upsert(EntityId::parse("L2").unwrap(), SellerRecord::default());
        assert!(view.contains(&EntityId::parse("L2").unwrap()));
    }
}
