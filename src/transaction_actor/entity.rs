use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Transaction, TransactionCreate, TransactionId};

impl Entity for Transaction {
    type Id = TransactionId;
    type CreateParams = TransactionCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    /// Stamps the record with the insertion time.
    fn from_create_params(id: TransactionId, params: TransactionCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
            product_id: params.product_id,
            amount: params.amount,
            status: params.status,
            created_at: Utc::now(),
        })
    }

    /// Transactions are append-only.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Transactions are append-only".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
