//! Raw iRail response models
//!
//! iRail encodes most numbers and flags as JSON strings (`"delay": "180"`,
//! `"canceled": "1"`) but not consistently, so the fields below accept both
//! forms. The two journey shapes are kept apart as variants of
//! [`RailResponse`]; which one applies is known from the endpoint called.

use serde::Deserialize;

/// A decoded journey response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RailResponse {
    /// Departure board of a single station
    Liveboard(LiveboardResponse),
    /// Planned trips between two stations
    Connections(ConnectionsResponse),
}

/// `GET /liveboard/`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LiveboardResponse {
    #[serde(default)]
    pub station: Option<String>,
    /// Required: a body without it is not a liveboard
    pub departures: RawDepartures,
}

/// Container of liveboard entries
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawDepartures {
    #[serde(default)]
    pub departure: Vec<RawLiveboardEntry>,
}

/// One row of a liveboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLiveboardEntry {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub id: Option<String>,
    /// Final destination of the train
    pub station: String,
    /// Scheduled departure, Unix seconds
    #[serde(deserialize_with = "de::int")]
    pub time: i64,
    /// Delay in seconds
    #[serde(default, deserialize_with = "de::int")]
    pub delay: i64,
    #[serde(default, deserialize_with = "de::flag")]
    pub canceled: bool,
    pub vehicle: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub platform: Option<String>,
}

/// `GET /connections/`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ConnectionsResponse {
    /// Required: a body without it is not a connection list
    pub connection: Vec<RawConnection>,
}

/// One planned trip, possibly with interchanges
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawConnection {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub id: Option<String>,
    pub departure: RawEvent,
    pub arrival: RawEvent,
    #[serde(default)]
    pub vias: Option<RawVias>,
}

impl RawConnection {
    /// Interchange points in travel order
    #[must_use]
    pub fn vias(&self) -> &[RawVia] {
        self.vias.as_ref().map_or(&[], |v| v.via.as_slice())
    }
}

/// Container of interchange points
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawVias {
    #[serde(default)]
    pub via: Vec<RawVia>,
}

/// An interchange point within a connection
///
/// A via has no time of its own: the arriving and departing services are
/// described by the nested `arrival` and `departure` objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawVia {
    pub station: String,
    pub arrival: RawEvent,
    pub departure: RawEvent,
    /// Vehicle boarded at this interchange
    #[serde(default)]
    pub vehicle: Option<String>,
}

impl RawVia {
    /// Vehicle of the onward leg, preferring the nested departure object
    #[must_use]
    pub fn onward_vehicle(&self) -> &str {
        self.departure
            .vehicle
            .as_deref()
            .or(self.vehicle.as_deref())
            .unwrap_or_default()
    }
}

/// A timed stop event: the departure or arrival of one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    /// Present on connection endpoints, absent on via sub-objects
    #[serde(default)]
    pub station: Option<String>,
    /// Scheduled time, Unix seconds
    #[serde(deserialize_with = "de::int")]
    pub time: i64,
    /// Delay in seconds
    #[serde(default, deserialize_with = "de::int")]
    pub delay: i64,
    #[serde(default, deserialize_with = "de::flag")]
    pub canceled: bool,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub platform: Option<String>,
}

/// `GET /stations/`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub(crate) struct StationsResponse {
    #[serde(default)]
    pub station: Vec<Station>,
}

/// A station of the national rail network
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub id: String,
    /// Name in the requested language
    pub name: String,
    /// Name in the station's own language
    #[serde(default)]
    pub standardname: Option<String>,
}

mod de {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(n) => Ok(n),
            #[allow(clippy::cast_possible_truncation)]
            Scalar::Float(f) => Ok(f as i64),
            Scalar::Text(s) if s.trim().is_empty() => Ok(0),
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected integer, got {s:?}"))),
            Scalar::Bool(b) => Err(D::Error::custom(format!("expected integer, got {b}"))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Bool(b) => Ok(b),
            Scalar::Int(n) => Ok(n != 0),
            Scalar::Float(f) => Ok(f != 0.0),
            Scalar::Text(s) => Ok(matches!(s.trim(), "1" | "true")),
        }
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Text(s)) if s.trim().is_empty() => None,
            Some(Scalar::Text(s)) => Some(s),
            Some(Scalar::Int(n)) => Some(n.to_string()),
            Some(Scalar::Float(f)) => Some(f.to_string()),
            Some(Scalar::Bool(b)) => Some(b.to_string()),
            None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveboard_accepts_string_and_number_fields() {
        let json = r#"{
            "station": "Bruxelles-Midi",
            "departures": { "number": "2", "departure": [
                { "id": "0", "station": "Oostende", "time": "1768462200", "delay": "180",
                  "canceled": "0", "vehicle": "BE.NMBS.IC1832", "platform": "4" },
                { "id": 1, "station": "Liège-Guillemins", "time": 1768462800, "delay": 0,
                  "canceled": 1, "vehicle": "BE.NMBS.IC532", "platform": 12 }
            ]}
        }"#;
        let raw: LiveboardResponse = serde_json::from_str(json).unwrap();
        let entries = &raw.departures.departure;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].delay, 180);
        assert!(!entries[0].canceled);
        assert_eq!(entries[1].id.as_deref(), Some("1"));
        assert!(entries[1].canceled);
        assert_eq!(entries[1].platform.as_deref(), Some("12"));
    }

    #[test]
    fn liveboard_with_zero_departures_is_empty() {
        let raw: LiveboardResponse =
            serde_json::from_str(r#"{"station":"Arlon","departures":{"number":"0"}}"#).unwrap();
        assert!(raw.departures.departure.is_empty());
    }

    #[test]
    fn liveboard_without_departures_key_is_rejected() {
        assert!(serde_json::from_str::<LiveboardResponse>(r#"{"station":"Arlon"}"#).is_err());
        let error_body = r#"{"error":404,"message":"Could not find station"}"#;
        assert!(serde_json::from_str::<LiveboardResponse>(error_body).is_err());
    }

    #[test]
    fn connections_without_connection_key_is_rejected() {
        let liveboard_shaped = r#"{"departures":{"departure":[]}}"#;
        assert!(serde_json::from_str::<ConnectionsResponse>(liveboard_shaped).is_err());
        assert!(serde_json::from_str::<ConnectionsResponse>("[]").is_err());
    }

    #[test]
    fn connections_with_empty_list_is_empty() {
        let raw: ConnectionsResponse = serde_json::from_str(r#"{"connection":[]}"#).unwrap();
        assert!(raw.connection.is_empty());
    }

    #[test]
    fn missing_cancel_flag_and_blank_platform() {
        let json = r#"{ "station": "Namur", "time": "1768462200", "vehicle": "BE.NMBS.L6470", "platform": "" }"#;
        let entry: RawLiveboardEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.canceled);
        assert_eq!(entry.delay, 0);
        assert!(entry.platform.is_none());
    }

    #[test]
    fn non_numeric_time_is_rejected() {
        let json = r#"{ "station": "Namur", "time": "soon", "vehicle": "BE.NMBS.L6470" }"#;
        assert!(serde_json::from_str::<RawLiveboardEntry>(json).is_err());
    }

    #[test]
    fn connection_without_vias() {
        let json = r#"{ "connection": [{
            "id": "0",
            "departure": { "station": "Bruxelles-Midi", "time": "1768460400", "vehicle": "BE.NMBS.IC2117" },
            "arrival": { "station": "Gent-Sint-Pieters", "time": "1768462320" }
        }]}"#;
        let raw: ConnectionsResponse = serde_json::from_str(json).unwrap();
        assert!(raw.connection[0].vias().is_empty());
    }

    #[test]
    fn via_onward_vehicle_prefers_nested_departure() {
        let json = r#"{
            "station": "Gent-Sint-Pieters",
            "vehicle": "BE.NMBS.IC9999",
            "arrival": { "time": "1768462320", "vehicle": "BE.NMBS.IC2117" },
            "departure": { "time": "1768462800", "vehicle": "BE.NMBS.IC1832" }
        }"#;
        let via: RawVia = serde_json::from_str(json).unwrap();
        assert_eq!(via.onward_vehicle(), "BE.NMBS.IC1832");

        let json = r#"{
            "station": "Gent-Sint-Pieters",
            "vehicle": "BE.NMBS.IC9999",
            "arrival": { "time": "1768462320" },
            "departure": { "time": "1768462800" }
        }"#;
        let via: RawVia = serde_json::from_str(json).unwrap();
        assert_eq!(via.onward_vehicle(), "BE.NMBS.IC9999");
    }

    #[test]
    fn stations_directory() {
        let json = r#"{ "station": [
            { "id": "BE.NMBS.008814001", "name": "Bruxelles-Midi", "standardname": "Brussel-Zuid" },
            { "id": "BE.NMBS.008892007", "name": "Gand-Saint-Pierre" }
        ]}"#;
        let raw: StationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(raw.station.len(), 2);
        assert_eq!(raw.station[0].standardname.as_deref(), Some("Brussel-Zuid"));
        assert!(raw.station[1].standardname.is_none());
    }
}
