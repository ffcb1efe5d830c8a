//! Belgian rail integration
//!
//! Provides liveboards, point-to-point connections and the station directory
//! of the national railway via the [iRail](https://api.irail.be) open-data API,
//! and normalizes both journey shapes into the uniform departure model.
//!
//! # Architecture
//!
//! [`RailClient`] defines the interface for the three upstream calls and is
//! implemented by [`IRailClient`]. Raw responses are decoded into the
//! [`RailResponse`] tagged union at the boundary; [`ItineraryNormalizer`]
//! turns either variant into a [`domain::SearchResult`] with one exhaustive match.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::SearchOptions;
//! use integration_irail::{IRailClient, IRailConfig, ItineraryNormalizer, RailClient};
//!
//! let client = IRailClient::new(&IRailConfig::default())?;
//! let raw = client
//!     .journeys("Bruxelles-Midi", Some("Namur"), &SearchOptions::now())
//!     .await?;
//! let result = ItineraryNormalizer::default().normalize(&raw)?;
//! ```

mod client;
mod config;
mod error;
pub mod format;
mod models;
mod normalize;

pub use client::{IRailClient, RailClient};
pub use config::IRailConfig;
pub use error::IRailError;
pub use models::{
    ConnectionsResponse, LiveboardResponse, RailResponse, RawConnection, RawEvent,
    RawLiveboardEntry, RawVia, Station,
};
pub use normalize::{IRAIL_SOURCE_TITLE, IRAIL_SOURCE_URI, ItineraryNormalizer};
