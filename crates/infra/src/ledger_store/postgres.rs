//! Postgres-backed ledger store.
//!
//! Expects a table provisioned outside this crate:
//!
//! ```sql
//! CREATE TABLE ledger_entries (
//!     id          BIGSERIAL PRIMARY KEY,
//!     owner_id    BIGINT  NOT NULL,
//!     amount      NUMERIC NOT NULL CHECK (amount >= 0),
//!     direction   TEXT    NOT NULL CHECK (direction IN ('credit', 'debit')),
//!     tag         TEXT    NOT NULL,
//!     entry_date  DATE    NOT NULL
//! );
//! CREATE INDEX ledger_entries_owner ON ledger_entries (owner_id, entry_date);
//! ```
//!
//! Every statement carries `owner_id` in its WHERE clause. Filters are
//! rendered from [`EntryPredicate`] clauses with bound parameters only.
//! Balance and tag totals are computed by the database.

use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use moneta_core::{EntryId, OwnerId};
use moneta_ledger::{Clause, Direction, EntryPatch, EntryPredicate, LedgerEntry, NewEntry, TagTotal};

use super::{LedgerStore, StoreError};

const COLUMNS: &str = "id, owner_id, amount, direction, tag, entry_date";

#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

/// Append ` WHERE owner_id = $n AND ...` for the predicate, in clause order.
fn push_where(qb: &mut QueryBuilder<'static, Postgres>, predicate: &EntryPredicate) {
    qb.push(" WHERE owner_id = ").push_bind(predicate.owner().get());
    for clause in predicate.clauses() {
        match clause {
            Clause::Direction(d) => qb.push(" AND direction = ").push_bind(d.as_str()),
            Clause::Tag(t) => qb.push(" AND tag = ").push_bind(t.clone()),
            Clause::DateFrom(d) => qb.push(" AND entry_date >= ").push_bind(*d),
            Clause::DateTo(d) => qb.push(" AND entry_date <= ").push_bind(*d),
        };
    }
}

fn select_entries(predicate: &EntryPredicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM ledger_entries"));
    push_where(&mut qb, predicate);
    qb.push(" ORDER BY id ASC");
    qb
}

fn select_tag_totals(predicate: &EntryPredicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT tag, SUM(amount) AS total FROM ledger_entries");
    push_where(&mut qb, predicate);
    qb.push(" GROUP BY tag ORDER BY tag ASC");
    qb
}

fn entry_from_row(row: &PgRow) -> Result<LedgerEntry, StoreError> {
    let get_err = |e| map_sqlx_error("decode_row", e);

    let raw_owner: i64 = row.try_get("owner_id").map_err(get_err)?;
    let owner_id = OwnerId::new(raw_owner)
        .ok_or_else(|| StoreError::Corrupt(format!("negative owner_id {raw_owner}")))?;

    let raw_direction: String = row.try_get("direction").map_err(get_err)?;
    let direction = Direction::parse(&raw_direction)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown direction '{raw_direction}'")))?;

    Ok(LedgerEntry {
        id: EntryId::new(row.try_get("id").map_err(get_err)?),
        owner_id,
        amount: row.try_get("amount").map_err(get_err)?,
        direction,
        tag: row.try_get("tag").map_err(get_err)?,
        date: row.try_get("entry_date").map_err(get_err)?,
    })
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("{operation}: {e}"))
        }
        other => StoreError::Unavailable(format!("{operation}: {other}")),
    }
}

#[async_trait::async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(skip(self, entry), fields(owner_id = %entry.owner_id), err)]
    async fn insert(&self, entry: NewEntry) -> Result<LedgerEntry, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO ledger_entries (owner_id, amount, direction, tag, entry_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(entry.owner_id.get())
        .bind(entry.amount)
        .bind(entry.direction.as_str())
        .bind(&entry.tag)
        .bind(entry.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        entry_from_row(&row)
    }

    #[instrument(skip(self), fields(owner_id = %owner, entry_id = %id), err)]
    async fn find(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM ledger_entries WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id.get())
        .bind(owner.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find", e))?;

        row.as_ref().map(entry_from_row).transpose()
    }

    #[instrument(skip(self, predicate), fields(owner_id = %predicate.owner()), err)]
    async fn query(&self, predicate: &EntryPredicate) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut qb = select_entries(predicate);
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("query", e))?;

        rows.iter().map(entry_from_row).collect()
    }

    #[instrument(skip(self, patch), fields(owner_id = %owner, entry_id = %id), err)]
    async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE ledger_entries SET \
                 amount = COALESCE($1, amount), \
                 direction = COALESCE($2, direction), \
                 tag = COALESCE($3, tag), \
                 entry_date = COALESCE($4, entry_date) \
             WHERE id = $5 AND owner_id = $6 \
             RETURNING {COLUMNS}"
        ))
        .bind(patch.amount)
        .bind(patch.direction.map(|d| d.as_str()))
        .bind(patch.tag.as_deref())
        .bind(patch.date)
        .bind(id.get())
        .bind(owner.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.as_ref().map(entry_from_row).transpose()
    }

    #[instrument(skip(self), fields(owner_id = %owner, entry_id = %id), err)]
    async fn delete(&self, owner: OwnerId, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let row = sqlx::query(&format!(
            "DELETE FROM ledger_entries WHERE id = $1 AND owner_id = $2 RETURNING {COLUMNS}"
        ))
        .bind(id.get())
        .bind(owner.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete", e))?;

        row.as_ref().map(entry_from_row).transpose()
    }

    #[instrument(skip(self), fields(owner_id = %owner), err)]
    async fn balance(&self, owner: OwnerId) -> Result<Decimal, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(CASE WHEN direction = 'credit' THEN amount ELSE -amount END), 0) AS balance
            FROM ledger_entries
            WHERE owner_id = $1
            "#,
        )
        .bind(owner.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("balance", e))?;

        row.try_get("balance").map_err(|e| map_sqlx_error("balance", e))
    }

    #[instrument(skip(self, predicate), fields(owner_id = %predicate.owner()), err)]
    async fn tag_totals(&self, predicate: &EntryPredicate) -> Result<Vec<TagTotal>, StoreError> {
        let mut qb = select_tag_totals(predicate);
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("tag_totals", e))?;

        rows.iter()
            .map(|row| {
                Ok(TagTotal {
                    tag: row.try_get("tag").map_err(|e| map_sqlx_error("tag_totals", e))?,
                    total: row.try_get("total").map_err(|e| map_sqlx_error("tag_totals", e))?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_ledger::FilterSpec;

    fn owner() -> OwnerId {
        OwnerId::new(7).unwrap()
    }

    #[test]
    fn unfiltered_select_is_owner_scoped() {
        let qb = select_entries(&EntryPredicate::owned_by(owner()));
        assert_eq!(
            qb.sql(),
            "SELECT id, owner_id, amount, direction, tag, entry_date FROM ledger_entries \
             WHERE owner_id = $1 ORDER BY id ASC"
        );
    }

    #[test]
    fn clauses_render_in_order_with_bound_parameters() {
        let spec = FilterSpec {
            direction: Some("D".into()),
            tag: Some("food'; DROP TABLE ledger_entries; --".into()),
            date_start: Some("2024-01-10".into()),
            date_end: Some("2024-01-31".into()),
        };
        let predicate = EntryPredicate::build(owner(), &spec).unwrap();
        let qb = select_entries(&predicate);

        assert_eq!(
            qb.sql(),
            "SELECT id, owner_id, amount, direction, tag, entry_date FROM ledger_entries \
             WHERE owner_id = $1 AND direction = $2 AND tag = $3 AND entry_date >= $4 \
             AND entry_date <= $5 ORDER BY id ASC"
        );
    }

    #[test]
    fn tag_totals_group_by_tag() {
        let predicate = moneta_ledger::tag_totals_predicate(owner(), &FilterSpec::default()).unwrap();
        let qb = select_tag_totals(&predicate);

        assert_eq!(
            qb.sql(),
            "SELECT tag, SUM(amount) AS total FROM ledger_entries \
             WHERE owner_id = $1 AND direction = $2 GROUP BY tag ORDER BY tag ASC"
        );
    }
}
