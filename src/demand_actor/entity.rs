use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{DemandCreate, DemandId, DemandRequest};
use super::actions::DemandAction;

impl Entity for DemandRequest {
    type Id = DemandId;
    type CreateParams = DemandCreate;
    type Patch = ();
    type Action = DemandAction;
    type ActionResult = bool;

    fn from_create_params(id: DemandId, params: DemandCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
            machine_id: params.machine_id,
            product_name: params.product_name,
            fulfilled: false,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Demands change only through fulfilment".to_string())
    }

    fn handle_action(&mut self, action: DemandAction) -> Result<bool, String> {
        match action {
            DemandAction::MarkFulfilled if self.fulfilled => Ok(false),
            DemandAction::MarkFulfilled => {
                self.fulfilled = true;
                Ok(true)
            }
        }
    }
}
