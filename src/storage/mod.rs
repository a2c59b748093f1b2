//! Storage module for bluesdr
//!
//! Append-only SQLite ledger for confirmed leads and payments.

mod database;
mod models;

pub use database::{Database, DatabaseStats};
pub use models::{
    LeadRecord, PaymentMethod, PaymentRecord, PaymentStatus, LEAD_COLUMNS, PAYMENT_COLUMNS,
};
