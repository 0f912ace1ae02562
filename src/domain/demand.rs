use chrono::{DateTime, Utc};

use super::{DemandId, MachineId, UserId};

/// "User X wants product named N at machine M."
///
/// Matched against products by name rather than id, so a demand survives the
/// product row being recreated.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRequest {
    pub id: DemandId,
    pub user_id: UserId,
    pub machine_id: MachineId,
    pub product_name: String,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DemandCreate {
    pub user_id: UserId,
    pub machine_id: MachineId,
    pub product_name: String,
}

impl DemandRequest {
    /// Exact, case-insensitive comparison after trimming whitespace.
    /// "Cola" does not match "Cola Zero".
    pub fn matches_name(&self, product_name: &str) -> bool {
        normalize_name(&self.product_name) == normalize_name(product_name)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
