//! Ledger persistence boundary.
//!
//! Every method is scoped by owner: an entry that belongs to someone else is
//! indistinguishable from one that does not exist. Each mutating call is one
//! atomic unit against the store; concurrent updates are last-write-wins.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use moneta_core::{EntryId, OwnerId};
use moneta_ledger::{EntryPatch, EntryPredicate, LedgerEntry, NewEntry, TagTotal};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;

/// Store operation error (infrastructure, not domain).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored row is corrupt: {0}")]
    Corrupt(String),
}

#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a new entry and return it with its assigned id.
    async fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError>;

    async fn find(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError>;

    /// Entries matching the predicate, ordered by id.
    async fn query(&self, predicate: &EntryPredicate) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Apply a partial update; `None` when the owner has no such entry.
    async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Option<LedgerEntry>, StoreError>;

    /// Remove an entry and return its prior state; `None` when absent.
    async fn delete(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError>;

    /// Whole-history signed balance of an owner.
    async fn balance(&self, owner: OwnerId) -> Result<Decimal, StoreError> {
        let entries = self.query(&EntryPredicate::owned_by(owner)).await?;
        Ok(moneta_ledger::balance(&entries))
    }

    /// Per-tag sums over the entries selected by `predicate`.
    async fn tag_totals(&self, predicate: &EntryPredicate) -> Result<Vec<TagTotal>, StoreError> {
        let entries = self.query(predicate).await?;
        Ok(moneta_ledger::tag_totals(&entries))
    }
}

#[async_trait::async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        (**self).insert(entry).await
    }

    async fn find(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        (**self).find(owner, id).await
    }

    async fn query(&self, predicate: &EntryPredicate) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).query(predicate).await
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        (**self).update(owner, id, patch).await
    }

    async fn delete(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        (**self).delete(owner, id).await
    }

    async fn balance(&self, owner: OwnerId) -> Result<Decimal, StoreError> {
        (**self).balance(owner).await
    }

    async fn tag_totals(&self, predicate: &EntryPredicate) -> Result<Vec<TagTotal>, StoreError> {
        (**self).tag_totals(predicate).await
    }
}
