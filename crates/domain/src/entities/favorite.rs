//! Saved searches

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::Network;

/// A saved departure search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub network: Network,
    pub from: String,
    /// Only kept for networks that support a destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Favorite {
    /// Create a favorite, discarding a destination the network cannot use
    pub fn new(network: Network, from: impl Into<String>, to: Option<String>) -> Self {
        let to = to
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && network.supports_destination());
        Self {
            id: Uuid::new_v4(),
            network,
            from: from.into().trim().to_string(),
            to,
        }
    }

    /// Whether this favorite describes the same search as the given inputs
    #[must_use]
    pub fn matches(&self, network: Network, from: &str, to: Option<&str>) -> bool {
        self.network == network
            && self.from.eq_ignore_ascii_case(from.trim())
            && match (&self.to, to.map(str::trim).filter(|t| !t.is_empty())) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }

    /// Short label, e.g. `Bruxelles-Midi → Namur (SNCB)`
    #[must_use]
    pub fn label(&self) -> String {
        match &self.to {
            Some(to) => format!("{} → {} ({})", self.from, to, self.network),
            None => format!("{} ({})", self.from, self.network),
        }
    }
}
