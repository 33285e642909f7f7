use rust_decimal::Decimal;
use serde::Deserialize;

use moneta_ledger::{EntryInput, LedgerEntry, TagTotal};

// -------------------------
// Request DTOs (query string)
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct EntryIdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntryQuery {
    pub id: Option<String>,
    pub amount: Option<String>,
    #[serde(alias = "operation")]
    pub direction: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
}

impl UpdateEntryQuery {
    pub fn split(self) -> (Option<String>, EntryInput) {
        (
            self.id,
            EntryInput {
                amount: self.amount,
                direction: self.direction,
                tag: self.tag,
                date: self.date,
            },
        )
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn entry_to_json(e: LedgerEntry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id.get(),
        "owner_id": e.owner_id.get(),
        "amount": e.amount.to_string(),
        "direction": e.direction.as_str(),
        "tag": e.tag,
        "date": e.date.to_string(),
    })
}

pub fn tag_total_to_json(t: TagTotal) -> serde_json::Value {
    serde_json::json!({
        "tag": t.tag,
        "total": t.total.to_string(),
    })
}

pub fn balance_to_json(balance: Decimal) -> serde_json::Value {
    serde_json::json!({ "balance": balance.to_string() })
}
