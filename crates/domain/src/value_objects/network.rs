//! Transit network value object

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// A Belgian public transit network
///
/// Rail is served by a structured open-data API. The urban and regional
/// operators have no public journey API and are resolved through grounded
/// retrieval against their official portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// National railway (SNCB/NMBS)
    #[default]
    Sncb,
    /// Brussels urban network (STIB/MIVB)
    Stib,
    /// Flemish regional network
    DeLijn,
}

impl Network {
    /// All supported networks
    pub const ALL: [Self; 3] = [Self::Sncb, Self::Stib, Self::DeLijn];

    /// Stable lowercase identifier, used in cache keys and query strings
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Sncb => "sncb",
            Self::Stib => "stib",
            Self::DeLijn => "delijn",
        }
    }

    /// Human-readable operator name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sncb => "SNCB",
            Self::Stib => "STIB",
            Self::DeLijn => "De Lijn",
        }
    }

    /// Domain of the operator's official website
    #[must_use]
    pub const fn official_domain(&self) -> &'static str {
        match self {
            Self::Sncb => "belgiantrain.be",
            Self::Stib => "stib-mivb.be",
            Self::DeLijn => "delijn.be",
        }
    }

    /// URI of the operator's official real-time portal
    #[must_use]
    pub const fn portal_uri(&self) -> &'static str {
        match self {
            Self::Sncb => "https://www.belgiantrain.be",
            Self::Stib => "https://www.stib-mivb.be",
            Self::DeLijn => "https://www.delijn.be",
        }
    }

    /// Whether the network exposes a structured journey-planning API
    #[must_use]
    pub const fn has_structured_api(&self) -> bool {
        matches!(self, Self::Sncb)
    }

    /// Whether searches on this network take a destination into account
    #[must_use]
    pub const fn supports_destination(&self) -> bool {
        self.has_structured_api()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Network {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sncb" | "nmbs" | "sncb/nmbs" | "rail" => Ok(Self::Sncb),
            "stib" | "mivb" | "stib-mivb" => Ok(Self::Stib),
            "delijn" | "de-lijn" | "de lijn" | "de_lijn" => Ok(Self::DeLijn),
            _ => Err(DomainError::UnknownNetwork(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rail_has_structured_api() {
        assert!(Network::Sncb.has_structured_api());
        assert!(!Network::Stib.has_structured_api());
        assert!(!Network::DeLijn.has_structured_api());
    }

    #[test]
    fn official_portals() {
        assert_eq!(Network::Stib.official_domain(), "stib-mivb.be");
        assert_eq!(Network::Stib.portal_uri(), "https://www.stib-mivb.be");
        assert_eq!(Network::DeLijn.official_domain(), "delijn.be");
        assert_eq!(Network::DeLijn.portal_uri(), "https://www.delijn.be");
    }

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("SNCB".parse::<Network>().unwrap(), Network::Sncb);
        assert_eq!("nmbs".parse::<Network>().unwrap(), Network::Sncb);
        assert_eq!("MIVB".parse::<Network>().unwrap(), Network::Stib);
        assert_eq!("De Lijn".parse::<Network>().unwrap(), Network::DeLijn);
        assert_eq!(" delijn ".parse::<Network>().unwrap(), Network::DeLijn);
    }

    #[test]
    fn rejects_unknown_network() {
        let err = "TEC".parse::<Network>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownNetwork(ref s) if s == "TEC"));
    }

    #[test]
    fn display_uses_operator_name() {
        assert_eq!(Network::DeLijn.to_string(), "De Lijn");
        assert_eq!(Network::Sncb.to_string(), "SNCB");
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&Network::DeLijn).unwrap();
        assert_eq!(json, "\"delijn\"");
        let parsed: Network = serde_json::from_str("\"stib\"").unwrap();
        assert_eq!(parsed, Network::Stib);
    }
}
