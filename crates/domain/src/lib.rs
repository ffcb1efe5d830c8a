//! Domain layer for the Belgian transit departure board
//!
//! Contains the uniform departure model shared by every network, the
//! networks themselves, and the domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
