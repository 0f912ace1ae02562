use super::MachineId;

/// A physical vending machine. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct MachineCreate {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MachineCreate {
    pub fn new(name: impl Into<String>, location: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            latitude,
            longitude,
        }
    }
}
