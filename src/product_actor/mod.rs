//! Product-specific ledger logic: the stock counter actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
