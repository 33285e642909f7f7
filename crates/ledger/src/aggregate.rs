//! Derived views over an owner's entries: signed balance and per-tag totals.
//!
//! Both are recomputed from the entries on every call; nothing is cached.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use moneta_core::{DomainResult, OwnerId};

use crate::entry::{Direction, LedgerEntry};
use crate::filter::{EntryPredicate, FilterSpec};

/// Direction summed by tag totals: spending per category.
pub const TAG_TOTALS_DIRECTION: Direction = Direction::Debit;

/// Sum of amounts for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTotal {
    pub tag: String,
    pub total: Decimal,
}

/// `Σ credit amounts − Σ debit amounts`; zero for an empty set.
pub fn balance<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Decimal {
    entries
        .into_iter()
        .fold(Decimal::ZERO, |acc, e| acc + e.direction.signed(e.amount))
}

/// Group entries by tag and sum their amounts, sorted by tag.
///
/// Groups exactly the entries given; restricting them to
/// [`TAG_TOTALS_DIRECTION`] is the job of [`tag_totals_predicate`].
pub fn tag_totals<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Vec<TagTotal> {
    let mut groups: BTreeMap<&str, Decimal> = BTreeMap::new();
    for e in entries {
        *groups.entry(e.tag.as_str()).or_insert(Decimal::ZERO) += e.amount;
    }
    groups
        .into_iter()
        .map(|(tag, total)| TagTotal {
            tag: tag.to_string(),
            total,
        })
        .collect()
}

/// Predicate selecting the entries that feed tag totals.
///
/// Uses the tag and date filters of `filter`; the direction is always
/// [`TAG_TOTALS_DIRECTION`].
pub fn tag_totals_predicate(owner: OwnerId, filter: &FilterSpec) -> DomainResult<EntryPredicate> {
    EntryPredicate::with_direction(owner, TAG_TOTALS_DIRECTION, filter)
}
