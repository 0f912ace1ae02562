use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::UserClient;
use crate::demand_actor::{DemandAction, DemandError};
use crate::domain::{DemandCreate, DemandRequest, MachineId, Product, UserId};

/// A user whose demand was just fulfilled and who can be reached by push.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NotifiableUser {
    pub user_id: UserId,
    pub token: String,
}

/// Client for the demand tracker.
#[derive(Clone)]
pub struct DemandClient {
    inner: ResourceClient<DemandRequest>,
    user_client: UserClient,
}

impl DemandClient {
    pub fn new(inner: ResourceClient<DemandRequest>, user_client: UserClient) -> Self {
        Self { inner, user_client }
    }

    /// Records a pending demand. Repeat requests are kept as separate rows.
    #[instrument(skip(self))]
    pub async fn record_demand(
        &self,
        user_id: UserId,
        machine_id: MachineId,
        product_name: String,
    ) -> Result<DemandRequest, DemandError> {
        debug!("Sending request");
        let demand = self
            .inner
            .create(DemandCreate {
                user_id,
                machine_id,
                product_name,
            })
            .await?;
        info!(demand_id = demand.id, "Demand recorded");
        Ok(demand)
    }

    #[instrument(skip(self))]
    pub async fn pending_demands(&self, machine_id: MachineId) -> Result<Vec<DemandRequest>, DemandError> {
        debug!("Sending request");
        self.inner
            .query(move |d: &DemandRequest| !d.fulfilled && d.machine_id == machine_id)
            .await
            .map_err(DemandError::from)
    }

    /// Fulfils every pending demand for `product` at its machine and returns
    /// the affected users that have a push token, one entry per user.
    ///
    /// A demand is claimed by exactly one caller: if two restocks race, the
    /// loser sees the demand already fulfilled and skips it.
    #[instrument(skip(self, product), fields(product_id = product.id, product_name = %product.name))]
    pub async fn resolve_demands_for(&self, product: &Product) -> Result<Vec<NotifiableUser>, DemandError> {
        let Some(machine_id) = product.machine_id else {
            debug!("Product not assigned to a machine, no demand to resolve");
            return Ok(Vec::new());
        };

        let name = product.name.clone();
        let pending = self
            .inner
            .query(move |d: &DemandRequest| !d.fulfilled && d.machine_id == machine_id && d.matches_name(&name))
            .await?;

        // Claimed demands stay fulfilled, so a failed claim skips only itself.
        let mut claimed = BTreeSet::new();
        for demand in pending {
            match self.inner.perform_action(demand.id, DemandAction::MarkFulfilled).await {
                Ok(true) => {
                    claimed.insert(demand.user_id);
                }
                Ok(false) => debug!(demand_id = demand.id, "Demand already fulfilled elsewhere"),
                Err(e) => warn!(demand_id = demand.id, error = %e, "Could not mark demand fulfilled, skipping"),
            }
        }
        info!(users = claimed.len(), "Demands fulfilled");

        let mut notifiable = Vec::new();
        for user_id in claimed {
            match self.user_client.get_user(user_id).await {
                Ok(Some(user)) => match user.notification_token() {
                    Some(token) => notifiable.push(NotifiableUser {
                        user_id,
                        token: token.to_string(),
                    }),
                    None => debug!(user_id, "User has no push token"),
                },
                Ok(None) => warn!(user_id, "Demand references unknown user"),
                Err(e) => warn!(user_id, error = %e, "User lookup failed"),
            }
        }

        Ok(notifiable)
    }
}
