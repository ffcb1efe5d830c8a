//! Search result envelope

use serde::{Deserialize, Serialize};

use super::Departure;

/// A provenance record for retrieved information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

impl GroundingSource {
    /// Create a new source
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// Departures plus the sources they were obtained from
///
/// Departures keep upstream order. Sources are unique by URI and keep
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub departures: Vec<Departure>,
    pub sources: Vec<GroundingSource>,
}

impl SearchResult {
    /// Create a result with no sources
    #[must_use]
    pub const fn new(departures: Vec<Departure>) -> Self {
        Self {
            departures,
            sources: Vec::new(),
        }
    }

    /// Add a source unless one with the same URI is already present
    ///
    /// Returns `true` if the source was added.
    pub fn push_source(&mut self, source: GroundingSource) -> bool {
        if self.sources.iter().any(|s| s.uri == source.uri) {
            return false;
        }
        self.sources.push(source);
        true
    }

    /// Builder form of [`Self::push_source`]
    #[must_use]
    pub fn with_source(mut self, source: GroundingSource) -> Self {
        self.push_source(source);
        self
    }

    /// A well-formed response with zero departures
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }
}
