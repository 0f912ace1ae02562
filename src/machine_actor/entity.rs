use crate::actor_framework::Entity;
use crate::domain::{Machine, MachineCreate, MachineId};

impl Entity for Machine {
    type Id = MachineId;
    type CreateParams = MachineCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn from_create_params(id: MachineId, params: MachineCreate) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&params.latitude) || !(-180.0..=180.0).contains(&params.longitude) {
            return Err(format!(
                "Invalid coordinates: ({}, {})",
                params.latitude, params.longitude
            ));
        }
        Ok(Self {
            id,
            name: params.name,
            location: params.location,
            latitude: params.latitude,
            longitude: params.longitude,
        })
    }

    /// Machines are immutable once registered.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Machines cannot be modified".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
