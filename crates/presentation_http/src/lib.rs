//! HTTP presentation layer - axum JSON API
//!
//! Exposes the departure dispatcher and the stop resolver.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
