//! Stock-consistency and notification core of a vending-machine backend.
//!
//! Each entity store runs as a [`ResourceActor`](actor_framework::ResourceActor)
//! task; the clients in [`clients`] wrap those stores and orchestrate
//! purchases, hardware sale sync, restocks and demand notification on top of
//! them. [`VendingSystem`](app_system::VendingSystem) wires everything up.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod locator;
pub mod notifications;
pub mod payment;

pub mod demand_actor;
pub mod machine_actor;
pub mod product_actor;
pub mod transaction_actor;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, VendingSystem};
pub use config::Config;
pub use error::{PurchaseError, RestockError};
