//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Numeric identity of the user owning a ledger entry.
///
/// Always non-negative; it is taken from the caller's identity claim and never
/// from request parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

/// Identifier of a ledger entry, assigned by the store at creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl OwnerId {
    /// Returns `None` for negative values.
    pub fn new(value: i64) -> Option<Self> {
        (value >= 0).then_some(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl EntryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

macro_rules! impl_numeric_id {
    ($t:ty) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_numeric_id!(OwnerId);
impl_numeric_id!(EntryId);

impl FromStr for EntryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::validation(format!("EntryId: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_rejects_negative_values() {
        assert!(OwnerId::new(-1).is_none());
        assert_eq!(OwnerId::new(0).map(|o| o.get()), Some(0));
    }

    #[test]
    fn entry_id_parses_decimal_strings() {
        assert_eq!("42".parse::<EntryId>().unwrap(), EntryId::new(42));
        assert!(matches!("x1".parse::<EntryId>(), Err(DomainError::Validation(_))));
    }
}
