//! Fire-and-forget side channels: device push and live dashboard broadcast.

pub mod dispatcher;
pub mod live_feed;
pub mod push;

pub use dispatcher::*;
pub use live_feed::*;
pub use push::*;
