use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Machine, MachineCreate};
use crate::locator::{self, NearestMachine};
use crate::machine_actor::MachineError;

/// Client for the machine registry.
#[derive(Clone)]
pub struct MachineClient {
    inner: ResourceClient<Machine>,
}

impl_basic_client!(MachineClient, Machine, MachineError, fn get_machine);

impl MachineClient {
    #[instrument(skip(self, machine), fields(machine_name = %machine.name))]
    pub async fn create_machine(&self, machine: MachineCreate) -> Result<Machine, MachineError> {
        debug!("Sending request");
        self.inner.create(machine).await.map_err(MachineError::from)
    }

    /// All machines in registration order.
    #[instrument(skip(self))]
    pub async fn list_machines(&self) -> Result<Vec<Machine>, MachineError> {
        debug!("Sending request");
        self.inner.list().await.map_err(MachineError::from)
    }

    #[instrument(skip(self))]
    pub async fn nearest_machine(&self, latitude: f64, longitude: f64) -> Result<NearestMachine, MachineError> {
        let machines = self.list_machines().await?;
        let found = locator::nearest(latitude, longitude, &machines)?;
        info!(machine_id = found.machine.id, distance_km = found.distance_km, "Nearest machine found");
        Ok(found)
    }
}
