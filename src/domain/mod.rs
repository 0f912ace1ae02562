pub mod user;
pub mod product;
pub mod machine;
pub mod transaction;
pub mod demand;
pub mod event;

pub use user::*;
pub use product::*;
pub use machine::*;
pub use transaction::*;
pub use demand::*;
pub use event::*;

pub type UserId = u64;
pub type ProductId = u64;
pub type MachineId = u64;
pub type TransactionId = u64;
pub type DemandId = u64;
