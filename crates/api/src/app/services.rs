//! Ledger entry lifecycle operations.
//!
//! Each operation resolves the caller's identity first, validates its input
//! second, and only then reaches the store. Nothing is written unless both
//! checks pass.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use moneta_auth::{IdentityError, IdentityResolver, SecurityContext};
use moneta_core::{DomainError, EntryId};
use moneta_infra::{LedgerStore, StoreError};
use moneta_ledger::{EntryInput, EntryPredicate, FilterSpec, LedgerEntry, TagTotal, tag_totals_predicate};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    resolver: IdentityResolver,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>, resolver: IdentityResolver) -> Self {
        Self { store, resolver }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    #[instrument(skip_all, err)]
    pub async fn create(&self, ctx: Option<&SecurityContext>, input: EntryInput) -> Result<LedgerEntry, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        let new_entry = input.into_new_entry(owner)?;

        let entry = self.store.insert(new_entry).await?;
        tracing::info!(owner_id = %owner, entry_id = %entry.id, "ledger entry created");
        Ok(entry)
    }

    #[instrument(skip_all, err)]
    pub async fn list(&self, ctx: Option<&SecurityContext>, filter: &FilterSpec) -> Result<Vec<LedgerEntry>, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        let predicate = EntryPredicate::build(owner, filter)?;

        Ok(self.store.query(&predicate).await?)
    }

    #[instrument(skip_all, err)]
    pub async fn update(
        &self,
        ctx: Option<&SecurityContext>,
        id: Option<&str>,
        input: EntryInput,
    ) -> Result<LedgerEntry, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        let id = parse_entry_id(id)?;
        let patch = input.into_patch()?;

        let entry = self
            .store
            .update(owner, id, &patch)
            .await?
            .ok_or(DomainError::NotFound)?;
        tracing::info!(owner_id = %owner, entry_id = %id, "ledger entry updated");
        Ok(entry)
    }

    #[instrument(skip_all, err)]
    pub async fn delete(&self, ctx: Option<&SecurityContext>, id: Option<&str>) -> Result<LedgerEntry, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        let id = parse_entry_id(id)?;

        let entry = self.store.delete(owner, id).await?.ok_or(DomainError::NotFound)?;
        tracing::info!(owner_id = %owner, entry_id = %id, "ledger entry deleted");
        Ok(entry)
    }

    /// Whole-history balance; date filters never apply here.
    #[instrument(skip_all, err)]
    pub async fn balance(&self, ctx: Option<&SecurityContext>) -> Result<Decimal, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        Ok(self.store.balance(owner).await?)
    }

    #[instrument(skip_all, err)]
    pub async fn tag_totals(&self, ctx: Option<&SecurityContext>, filter: &FilterSpec) -> Result<Vec<TagTotal>, ServiceError> {
        let owner = self.resolver.resolve(ctx)?;
        let predicate = tag_totals_predicate(owner, filter)?;

        Ok(self.store.tag_totals(&predicate).await?)
    }
}

fn parse_entry_id(raw: Option<&str>) -> Result<EntryId, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse(),
        None => Err(DomainError::validation("field 'id' is required")),
    }
}
