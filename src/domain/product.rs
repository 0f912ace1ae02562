use super::{MachineId, ProductId};

/// A product slot in a vending machine.
///
/// `stock` is unsigned, so the ledger can never represent a negative count.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    /// `None` for products not yet assigned to a machine.
    pub machine_id: Option<MachineId>,
}

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub machine_id: Option<MachineId>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64, stock: u32, machine_id: Option<MachineId>) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            machine_id,
        }
    }
}
