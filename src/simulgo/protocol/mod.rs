pub(crate) mod broker;
pub(crate) mod message;

pub use broker::{Broker, LoopbackChannel};
pub use message::{Message, WireMove, WireMoveRecord, WireScoring};
