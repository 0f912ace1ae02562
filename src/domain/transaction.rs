use chrono::{DateTime, Utc};

use super::{ProductId, TransactionId, UserId};

pub const STATUS_COMPLETED: &str = "Completed";

/// A completed purchase. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub amount: f64,
    pub status: String,
}
