//! Filter predicate builder.
//!
//! A [`FilterSpec`] holds the raw optional filters of a list query. Building
//! an [`EntryPredicate`] validates them and produces an owner-scoped
//! conjunction of [`Clause`]s, always in the order direction, tag, date
//! start, date end. Stores either evaluate the predicate in memory
//! ([`EntryPredicate::matches`]) or render its clauses into a query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use moneta_core::{DomainError, DomainResult, OwnerId};

use crate::entry::{Direction, LedgerEntry, non_blank};

/// Optional constraints of a list/aggregation query, as received.
///
/// Absent or blank fields mean "no constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, alias = "operation")]
    pub direction: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, rename = "dateStart")]
    pub date_start: Option<String>,
    #[serde(default, rename = "dateEnd")]
    pub date_end: Option<String>,
}

/// One constraint of an entry predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Direction(Direction),
    Tag(String),
    /// Inclusive lower bound on the entry date.
    DateFrom(NaiveDate),
    /// Inclusive upper bound on the entry date.
    DateTo(NaiveDate),
}

impl Clause {
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        match self {
            Clause::Direction(d) => entry.direction == *d,
            Clause::Tag(t) => entry.tag == *t,
            Clause::DateFrom(from) => entry.date >= *from,
            Clause::DateTo(to) => entry.date <= *to,
        }
    }
}

/// Owner-scoped conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPredicate {
    owner: OwnerId,
    clauses: Vec<Clause>,
}

impl EntryPredicate {
    /// Every entry of `owner`, unconstrained.
    pub fn owned_by(owner: OwnerId) -> Self {
        Self {
            owner,
            clauses: Vec::new(),
        }
    }

    /// Build the predicate for a list query.
    ///
    /// Fails with [`DomainError::InvalidFilter`] on an unmapped direction or
    /// an unparseable date; filters are never silently dropped.
    pub fn build(owner: OwnerId, filter: &FilterSpec) -> DomainResult<Self> {
        let mut predicate = Self::owned_by(owner);

        if let Some(raw) = non_blank(&filter.direction) {
            let direction = Direction::parse(raw).ok_or_else(|| {
                DomainError::invalid_filter(format!("direction must be C or D, got '{raw}'"))
            })?;
            predicate.clauses.push(Clause::Direction(direction));
        }
        predicate.push_tag_and_dates(filter)?;

        Ok(predicate)
    }

    /// Tag and date constraints of `filter`, with a fixed direction.
    ///
    /// Any direction present in `filter` is ignored.
    pub fn with_direction(owner: OwnerId, direction: Direction, filter: &FilterSpec) -> DomainResult<Self> {
        let mut predicate = Self::owned_by(owner);
        predicate.clauses.push(Clause::Direction(direction));
        predicate.push_tag_and_dates(filter)?;
        Ok(predicate)
    }

    fn push_tag_and_dates(&mut self, filter: &FilterSpec) -> DomainResult<()> {
        if let Some(tag) = non_blank(&filter.tag) {
            self.clauses.push(Clause::Tag(tag.to_string()));
        }
        if let Some(raw) = non_blank(&filter.date_start) {
            self.clauses.push(Clause::DateFrom(parse_filter_date("dateStart", raw)?));
        }
        if let Some(raw) = non_blank(&filter.date_end) {
            self.clauses.push(Clause::DateTo(parse_filter_date("dateEnd", raw)?));
        }
        Ok(())
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.owner_id == self.owner && self.clauses.iter().all(|c| c.matches(entry))
    }
}

fn parse_filter_date(field: &str, raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::invalid_filter(format!("{field} is not a YYYY-MM-DD date: {raw}")))
}
