//! Static stop gazetteer
//!
//! Canonical stop names known without any network call, used as the first
//! and cheapest autocomplete source.

use std::collections::HashMap;

use domain::Network;

const SNCB_STATIONS: &[&str] = &[
    "Bruxelles-Midi",
    "Bruxelles-Central",
    "Bruxelles-Nord",
    "Bruxelles-Luxembourg",
    "Bruxelles-Schuman",
    "Anvers-Central",
    "Gand-Saint-Pierre",
    "Liège-Guillemins",
    "Namur",
    "Charleroi-Central",
    "Louvain (Leuven)",
    "Malines (Mechelen)",
    "Bruges (Brugge)",
    "Ostende",
    "Mons",
    "Verviers-Central",
    "Tournai",
    "Arlon",
    "Hasselt",
    "Ottignies",
    "Braine-l'Alleud",
    "Nivelles",
    "Gembloux",
    "Courtrai (Kortrijk)",
    "Alost (Aalst)",
    "Aalst",
    "Denderleeuw",
    "Louvain-la-Neuve",
    "Zaventem (Brussels Airport)",
    "Zottegem",
    "Grammont (Geraardsbergen)",
    "Audenarde (Oudenaarde)",
    "Renaix (Ronse)",
    "Wavre",
    "Enghien",
    "Soignies",
    "Luttre",
    "Marchienne-au-Pont",
    "Berchem",
    "Lierre (Lier)",
    "Turnhout",
    "Mol",
    "Herentals",
    "Diest",
    "Tongres (Tongeren)",
    "Ciney",
    "Libramont",
    "Marloie",
    "Rochefort-Jemelle",
    "Eupen",
    "Welkenraedt",
    "Visé",
    "Genk",
    "Beveren",
    "Saint-Nicolas (Sint-Niklaas)",
    "Termonde (Dendermonde)",
    "Knokke",
    "Blankenberge",
    "La Panne (De Panne)",
    "Roulers (Roeselare)",
    "Ypres (Ieper)",
    "Poperinge",
    "Dunkerque",
    "Maastricht",
    "Luxembourg",
];

/// Case-insensitive substring filter, order preserved
pub fn filter_names<'a, I>(names: I, query: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// Per-network list of canonical stop names
#[derive(Debug, Clone)]
pub struct StopGazetteer {
    stops: HashMap<Network, Vec<String>>,
}

impl Default for StopGazetteer {
    /// Built-in lists; only the rail network ships with one
    fn default() -> Self {
        Self::empty().with_stops(Network::Sncb, SNCB_STATIONS.iter().copied())
    }
}

impl StopGazetteer {
    /// Gazetteer without any known stop
    #[must_use]
    pub fn empty() -> Self {
        Self {
            stops: HashMap::new(),
        }
    }

    /// Replace the list for one network
    #[must_use]
    pub fn with_stops<I, S>(mut self, network: Network, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops
            .insert(network, names.into_iter().map(Into::into).collect());
        self
    }

    /// All local names for `network` containing `query`
    #[must_use]
    pub fn matches(&self, network: Network, query: &str) -> Vec<String> {
        self.stops.get(&network).map_or_else(Vec::new, |names| {
            filter_names(names.iter().map(String::as_str), query)
        })
    }
}
