//! Application layer - Use cases and orchestration
//!
//! Contains the departure dispatcher, the stop resolver and the smart-network
//! service, together with the ports their upstream collaborators implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
