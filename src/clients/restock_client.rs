use std::collections::{BTreeSet, HashMap};

use tracing::{info, instrument, warn};

use crate::clients::{DemandClient, InventoryClient};
use crate::domain::{Product, ProductId};
use crate::error::RestockError;
use crate::notifications::NotificationDispatcher;

#[derive(Debug, Clone, PartialEq)]
pub struct RestockOutcome {
    pub product: Product,
    /// Distinct device tokens a restock push was queued for.
    pub notified_users: usize,
    pub tokens: Vec<String>,
}

/// Vendor restock flow: add units, then tell whoever asked for them.
#[derive(Clone)]
pub struct RestockClient {
    inventory: InventoryClient,
    demand_client: DemandClient,
    dispatcher: NotificationDispatcher,
}

impl RestockClient {
    pub fn new(inventory: InventoryClient, demand_client: DemandClient, dispatcher: NotificationDispatcher) -> Self {
        Self {
            inventory,
            demand_client,
            dispatcher,
        }
    }

    /// Adds `amount` units and notifies users with pending demand for the
    /// product at its machine.
    ///
    /// The stock change is committed before any demand is touched. A failure
    /// while resolving demand is logged and leaves the restock in place.
    #[instrument(skip(self))]
    pub async fn restock(&self, product_id: ProductId, amount: u32) -> Result<RestockOutcome, RestockError> {
        let product = self.inventory.increment_stock(product_id, amount).await?;

        let users = match self.demand_client.resolve_demands_for(&product).await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Demand resolution failed, restock kept");
                Vec::new()
            }
        };

        let tokens: BTreeSet<String> = users.into_iter().map(|u| u.token).collect();
        for token in &tokens {
            let data = HashMap::from([
                ("type".to_string(), "restock".to_string()),
                ("product_id".to_string(), product.id.to_string()),
            ]);
            self.dispatcher.notify_user(
                token,
                "Item Restocked!",
                format!("{} is back in stock at your machine.", product.name),
                data,
            );
        }

        info!(stock = product.stock, notified_users = tokens.len(), "Restock completed");
        Ok(RestockOutcome {
            product,
            notified_users: tokens.len(),
            tokens: tokens.into_iter().collect(),
        })
    }
}
