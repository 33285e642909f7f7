//! `moneta-ledger`: ledger entries, filters and derived views.
//!
//! Pure domain code: no IO, no async. Stores evaluate the predicates built
//! here, and the aggregation functions run over whatever entry set a store
//! hands back.

pub mod aggregate;
pub mod entry;
pub mod filter;

pub use aggregate::{TAG_TOTALS_DIRECTION, TagTotal, balance, tag_totals, tag_totals_predicate};
pub use entry::{DEFAULT_TAG, Direction, EntryInput, EntryPatch, LedgerEntry, MAX_AMOUNT, NewEntry};
pub use filter::{Clause, EntryPredicate, FilterSpec};
