//! Nearest-machine lookup by great-circle distance.

use crate::domain::Machine;
use crate::machine_actor::MachineError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NearestMachine {
    pub machine: Machine,
    /// Rounded to two decimals.
    pub distance_km: f64,
}

/// Haversine distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (lat1.to_radians(), lon1.to_radians(), lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Closest machine to `(lat, lon)`. On equal distances the machine seen
/// first wins.
///
/// # Errors
/// - [`MachineError::Rejected`] for a non-finite or out-of-range query point
/// - [`MachineError::NoMachinesFound`] when `machines` is empty
pub fn nearest(lat: f64, lon: f64, machines: &[Machine]) -> Result<NearestMachine, MachineError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(MachineError::Rejected(format!("Invalid coordinates: ({lat}, {lon})")));
    }

    let mut best: Option<(&Machine, f64)> = None;

    for machine in machines {
        let distance = haversine_km(lat, lon, machine.latitude, machine.longitude);
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((machine, distance)),
        }
    }

    best.map(|(machine, distance)| NearestMachine {
        machine: machine.clone(),
        distance_km: (distance * 100.0).round() / 100.0,
    })
    .ok_or(MachineError::NoMachinesFound)
}
