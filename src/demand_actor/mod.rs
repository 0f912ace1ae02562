//! Demand records and their one-way pending -> fulfilled transition.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
