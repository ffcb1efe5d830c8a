//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod cache_port;
mod rail_data_port;
mod retrieval_port;

#[cfg(test)]
pub(crate) use cache_port::memory;
pub use cache_port::{CachePort, CachePortExt, CacheStats, freshness};
#[cfg(test)]
pub use rail_data_port::MockRailDataPort;
pub use rail_data_port::RailDataPort;
#[cfg(test)]
pub use retrieval_port::MockGroundedRetrievalPort;
pub use retrieval_port::{GroundedRetrievalPort, RetrievalAnswer, RetrievalQuery};
