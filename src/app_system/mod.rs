//! System orchestration, startup, and shutdown logic.

pub mod telemetry;
pub mod vending_system;

pub use telemetry::*;
pub use vending_system::*;
