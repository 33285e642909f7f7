use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::RwLock;

use moneta_core::{EntryId, OwnerId};
use moneta_ledger::{EntryPatch, EntryPredicate, LedgerEntry, NewEntry};

use super::{LedgerStore, StoreError};

/// In-memory ledger store for tests/dev.
///
/// Ids are assigned from a counter starting at 1 and never reused.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: RwLock<BTreeMap<EntryId, LedgerEntry>>,
    last_id: AtomicI64,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        let id = EntryId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = LedgerEntry::from_new(id, entry);
        self.entries.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let map = self.entries.read().await;
        Ok(map.get(&id).filter(|e| e.owner_id == owner).cloned())
    }

    async fn query(&self, predicate: &EntryPredicate) -> Result<Vec<LedgerEntry>, StoreError> {
        let map = self.entries.read().await;
        Ok(map.values().filter(|e| predicate.matches(e)).cloned().collect())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let mut map = self.entries.write().await;
        let Some(entry) = map.get_mut(&id).filter(|e| e.owner_id == owner) else {
            return Ok(None);
        };
        patch.apply(entry);
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let mut map = self.entries.write().await;
        if map.get(&id).is_none_or(|e| e.owner_id != owner) {
            return Ok(None);
        }
        Ok(map.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use moneta_ledger::{Direction, FilterSpec, TagTotal};
    use rust_decimal::Decimal;

    fn owner(n: i64) -> OwnerId {
        OwnerId::new(n).unwrap()
    }

    fn new_entry(who: i64, amount: i64, direction: Direction, tag: &str, day: u32) -> NewEntry {
        NewEntry {
            owner_id: owner(who),
            amount: Decimal::new(amount, 0),
            direction,
            tag: tag.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemoryLedgerStore::new();
        let a = store.insert(new_entry(1, 10, Direction::Credit, "x", 1)).await.unwrap();
        let b = store.insert(new_entry(1, 10, Direction::Credit, "x", 1)).await.unwrap();
        assert_eq!(a.id, EntryId::new(1));
        assert_eq!(b.id, EntryId::new(2));
    }

    #[tokio::test]
    async fn query_is_owner_scoped_and_ordered() {
        let store = InMemoryLedgerStore::new();
        store.insert(new_entry(1, 100, Direction::Credit, "salary", 1)).await.unwrap();
        store.insert(new_entry(2, 5, Direction::Debit, "food", 2)).await.unwrap();
        store.insert(new_entry(1, 30, Direction::Debit, "food", 15)).await.unwrap();

        let mine = store.query(&EntryPredicate::owned_by(owner(1))).await.unwrap();
        let ids: Vec<i64> = mine.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn default_aggregations_use_the_predicate() {
        let store = InMemoryLedgerStore::new();
        store.insert(new_entry(1, 100, Direction::Credit, "salary", 1)).await.unwrap();
        store.insert(new_entry(1, 30, Direction::Debit, "food", 15)).await.unwrap();
        store.insert(new_entry(2, 999, Direction::Debit, "food", 15)).await.unwrap();

        assert_eq!(store.balance(owner(1)).await.unwrap(), Decimal::new(70, 0));
        assert_eq!(store.balance(owner(3)).await.unwrap(), Decimal::ZERO);

        let predicate = moneta_ledger::tag_totals_predicate(owner(1), &FilterSpec::default()).unwrap();
        assert_eq!(
            store.tag_totals(&predicate).await.unwrap(),
            vec![TagTotal { tag: "food".into(), total: Decimal::new(30, 0) }]
        );
    }

    #[tokio::test]
    async fn update_and_delete_refuse_other_owners() {
        let store = InMemoryLedgerStore::new();
        let e = store.insert(new_entry(1, 10, Direction::Credit, "x", 1)).await.unwrap();

        let patch = EntryPatch {
            amount: Some(Decimal::new(99, 0)),
            ..EntryPatch::default()
        };
        assert!(store.update(owner(2), e.id, &patch).await.unwrap().is_none());
        assert!(store.delete(owner(2), e.id).await.unwrap().is_none());
        assert_eq!(store.find(owner(1), e.id).await.unwrap(), Some(e.clone()));

        let updated = store.update(owner(1), e.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.amount, Decimal::new(99, 0));
        assert_eq!(updated.tag, e.tag);

        let deleted = store.delete(owner(1), e.id).await.unwrap();
        assert_eq!(deleted, Some(updated));
        assert!(store.find(owner(1), e.id).await.unwrap().is_none());
    }
}
