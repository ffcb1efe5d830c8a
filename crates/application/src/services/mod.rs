//! Application services

pub mod cache_keys;
pub mod gazetteer;
pub mod in_flight;
pub mod smart_network_service;
pub mod stop_resolver;
pub mod transport_service;

pub use gazetteer::StopGazetteer;
pub use in_flight::InFlightGate;
pub use smart_network_service::SmartNetworkService;
pub use stop_resolver::{MAX_SUGGESTIONS, StopResolver};
pub use transport_service::TransportService;
