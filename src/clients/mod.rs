//! Typed handles over the store actors, plus the purchase and restock
//! orchestrators built on top of them.

#[macro_use]
mod macros;

pub mod demand_client;
pub mod inventory_client;
pub mod machine_client;
pub mod purchase_client;
pub mod restock_client;
pub mod user_client;

pub use demand_client::*;
pub use inventory_client::*;
pub use machine_client::*;
pub use purchase_client::*;
pub use restock_client::*;
pub use user_client::*;
