//! Value Objects - Immutable, identity-less domain primitives

mod clock_time;
mod network;
mod search_options;

pub use clock_time::ClockTime;
pub use network::Network;
pub use search_options::{BRUSSELS, SearchOptions};
