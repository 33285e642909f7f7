use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use moneta_core::{DomainError, DomainResult, EntryId, OwnerId};

/// Tag stored when an entry is created without one.
pub const DEFAULT_TAG: &str = "Outros";

/// Largest accepted amount (10^15).
///
/// Keeps balances and tag totals far inside `Decimal`'s range, so summing
/// every entry an owner can store never overflows.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Sign classification of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increases the balance.
    Credit,
    /// Decreases the balance.
    Debit,
}

impl Direction {
    /// Case-insensitive parse of `C`/`D`/`credit`/`debit`.
    ///
    /// Shared by entry validation and filter building; callers decide which
    /// error an unmapped value becomes.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "credit" => Some(Self::Credit),
            "d" | "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Amount with this direction's sign applied.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded financial movement.
///
/// # Invariants
/// - `owner_id` is set once at creation and never changes.
/// - `amount` is non-negative; the sign comes from `direction`.
/// - `tag` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub owner_id: OwnerId,
    pub amount: Decimal,
    pub direction: Direction,
    pub tag: String,
    pub date: NaiveDate,
}

impl LedgerEntry {
    pub fn from_new(id: EntryId, new: NewEntry) -> Self {
        Self {
            id,
            owner_id: new.owner_id,
            amount: new.amount,
            direction: new.direction,
            tag: new.tag,
            date: new.date,
        }
    }
}

/// A validated entry awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub owner_id: OwnerId,
    pub amount: Decimal,
    pub direction: Direction,
    pub tag: String,
    pub date: NaiveDate,
}

/// Partial update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub amount: Option<Decimal>,
    pub direction: Option<Direction>,
    pub tag: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EntryPatch {
    pub fn apply(&self, entry: &mut LedgerEntry) {
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(direction) = self.direction {
            entry.direction = direction;
        }
        if let Some(tag) = &self.tag {
            entry.tag = tag.clone();
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
    }
}

/// Raw entry fields as received from a caller.
///
/// Blank strings are treated exactly like absent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryInput {
    pub amount: Option<String>,
    #[serde(alias = "operation")]
    pub direction: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
}

impl EntryInput {
    /// Validate a create request; `amount`, `direction` and `date` are required.
    pub fn into_new_entry(self, owner_id: OwnerId) -> DomainResult<NewEntry> {
        let amount = parse_amount(non_blank(&self.amount))?
            .ok_or_else(|| DomainError::validation("field 'amount' is required"))?;
        let direction = parse_direction(non_blank(&self.direction))?
            .ok_or_else(|| DomainError::validation("field 'direction' is required"))?;
        let date = parse_date(non_blank(&self.date))?
            .ok_or_else(|| DomainError::validation("field 'date' is required"))?;

        let tag = match self.tag {
            Some(tag) if !tag.trim().is_empty() => tag,
            _ => DEFAULT_TAG.to_string(),
        };

        Ok(NewEntry {
            owner_id,
            amount,
            direction,
            tag,
            date,
        })
    }

    /// Validate an update request; every field is optional.
    pub fn into_patch(self) -> DomainResult<EntryPatch> {
        Ok(EntryPatch {
            amount: parse_amount(non_blank(&self.amount))?,
            direction: parse_direction(non_blank(&self.direction))?,
            tag: self.tag.filter(|t| !t.trim().is_empty()),
            date: parse_date(non_blank(&self.date))?,
        })
    }
}

pub(crate) fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_amount(raw: Option<&str>) -> DomainResult<Option<Decimal>> {
    let Some(raw) = raw else { return Ok(None) };
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("field 'amount' is not a decimal: {raw}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::validation("field 'amount' must not be negative"));
    }
    if amount > MAX_AMOUNT {
        return Err(DomainError::validation(format!("field 'amount' must not exceed {MAX_AMOUNT}")));
    }
    Ok(Some(amount))
}

fn parse_direction(raw: Option<&str>) -> DomainResult<Option<Direction>> {
    let Some(raw) = raw else { return Ok(None) };
    Direction::parse(raw)
        .map(Some)
        .ok_or_else(|| DomainError::validation(format!("field 'direction' must be C or D, got '{raw}'")))
}

fn parse_date(raw: Option<&str>) -> DomainResult<Option<NaiveDate>> {
    let Some(raw) = raw else { return Ok(None) };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DomainError::validation(format!("field 'date' is not a YYYY-MM-DD date: {raw}")))
}
