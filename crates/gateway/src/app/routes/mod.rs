pub mod ledger;
pub mod system;
pub mod users;
