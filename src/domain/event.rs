use serde::{Deserialize, Serialize};

use super::{MachineId, Product, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryAction {
    InventoryDeducted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Purchase,
    OfflineHardware,
}

/// Event pushed to live dashboard subscribers whenever stock changes hands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEvent {
    pub action: InventoryAction,
    pub product_id: ProductId,
    pub machine_id: Option<MachineId>,
    pub source: EventSource,
}

impl InventoryEvent {
    pub fn deducted(product: &Product, source: EventSource) -> Self {
        Self {
            action: InventoryAction::InventoryDeducted,
            product_id: product.id,
            machine_id: product.machine_id,
            source,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
