//! Departures for networks without a structured API
//!
//! Asks the grounded retrieval service to read the operator's official
//! real-time portal and answer with schema-constrained JSON, then validates
//! that JSON into domain departures.

use std::sync::Arc;

use domain::{
    ClockTime, Departure, DepartureStatus, GroundingSource, Network, SearchOptions, SearchResult,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{GroundedRetrievalPort, RetrievalQuery},
};

/// Title given to citations the retrieval service left untitled
pub const UNTITLED_SOURCE: &str = "Source temps réel";

/// Departure payload as the retrieval service returns it
#[derive(Debug, Deserialize)]
struct SmartPayload {
    departures: Vec<SmartDeparture>,
}

#[derive(Debug, Deserialize)]
struct SmartDeparture {
    #[serde(default)]
    id: Option<String>,
    line: Value,
    destination: String,
    time: String,
    #[serde(default)]
    delay: Option<String>,
    #[serde(default)]
    platform: Option<Value>,
    #[serde(default)]
    status: Option<String>,
}

/// JSON schema of the departures answer
fn departures_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "departures": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "line": { "type": "STRING" },
                        "destination": { "type": "STRING" },
                        "time": { "type": "STRING", "description": "HH:mm" },
                        "delay": { "type": "STRING", "nullable": true },
                        "platform": { "type": "STRING", "nullable": true },
                        "status": {
                            "type": "STRING",
                            "enum": ["on-time", "delayed", "cancelled"]
                        }
                    },
                    "required": ["line", "destination", "time", "status"]
                }
            }
        },
        "required": ["departures"]
    })
}

/// Strip a Markdown code fence around a JSON answer, if any
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Text form of a string-or-number JSON field
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_status(raw: Option<&str>, delay: Option<&str>) -> DepartureStatus {
    let normalized = raw.map(|s| s.trim().to_lowercase().replace(['_', ' '], "-"));
    match normalized.as_deref() {
        Some("cancelled" | "canceled" | "annulé" | "supprimé") => DepartureStatus::Cancelled,
        Some("delayed" | "late" | "retard" | "en-retard") => DepartureStatus::Delayed,
        Some("on-time" | "ontime" | "à-l'heure") => DepartureStatus::OnTime,
        _ if delay.is_some() => DepartureStatus::Delayed,
        _ => DepartureStatus::OnTime,
    }
}

/// Service answering departure searches through grounded retrieval
#[derive(Clone)]
pub struct SmartNetworkService {
    retrieval: Arc<dyn GroundedRetrievalPort>,
}

impl std::fmt::Debug for SmartNetworkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartNetworkService").finish_non_exhaustive()
    }
}

impl SmartNetworkService {
    pub fn new(retrieval: Arc<dyn GroundedRetrievalPort>) -> Self {
        Self { retrieval }
    }

    fn query(
        stop: &str,
        network: Network,
        destination: Option<&str>,
        options: &SearchOptions,
    ) -> RetrievalQuery {
        let moment = options.describe();
        let mode = network.display_name();
        let domain = network.official_domain();

        let system = format!(
            "Tu es un connecteur d'API virtuel pour les transports belges ({mode}). \
             Ta mission est d'extraire les horaires en temps réel de l'arrêt \"{stop}\" pour {moment}. \
             Utilise Google Search pour consulter DIRECTEMENT le portail temps réel officiel de {domain}. \
             Retourne uniquement un JSON contenant un tableau \"departures\" dont chaque élément a \
             les champs id, line, destination, time (HH:mm), delay (texte ou null), platform (ou null) \
             et status (\"on-time\", \"delayed\" ou \"cancelled\")."
        );

        let mut prompt = format!(
            "Donne-moi les prochains passages officiels en temps réel à l'arrêt {stop} ({mode}) \
             via le site {domain} pour {moment}."
        );
        if let Some(destination) = destination {
            prompt.push_str(&format!(" Ne garde que les lignes desservant {destination}."));
        }

        RetrievalQuery {
            system_instruction: Some(system),
            prompt,
            grounded: true,
            schema: departures_schema(),
        }
    }

    /// Fetch departures from `stop` on a network without a structured API
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the answer is not a departures object
    /// or when none of its entries is usable, or the retrieval error itself.
    #[instrument(skip(self, options), fields(network = %network))]
    pub async fn fetch(
        &self,
        stop: &str,
        network: Network,
        destination: Option<&str>,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApplicationError> {
        let answer = self
            .retrieval
            .retrieve(Self::query(stop, network, destination, options))
            .await?;

        let payload = Self::payload(&answer.text)?;

        let received = payload.departures.len();
        let departures = payload
            .departures
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| Self::departure(index, raw))
            .collect::<Vec<_>>();
        if received > 0 && departures.is_empty() {
            return Err(ApplicationError::MalformedResponse(format!(
                "none of the {received} departures had a readable time"
            )));
        }
        debug!(
            count = departures.len(),
            skipped = received - departures.len(),
            "Smart departures parsed"
        );

        let mut result = SearchResult::new(departures).with_source(GroundingSource::new(
            format!("Portail officiel {}", network.display_name()),
            network.portal_uri(),
        ));
        for citation in answer.citations {
            result.push_source(citation);
        }
        Ok(result)
    }

    /// Decode the answer text; it must be an object carrying `departures`
    fn payload(text: &str) -> Result<SmartPayload, ApplicationError> {
        let value: Value = serde_json::from_str(strip_fence(text))
            .map_err(|e| ApplicationError::MalformedResponse(format!("departures JSON: {e}")))?;
        if !value.is_object() {
            return Err(ApplicationError::MalformedResponse(
                "departures JSON: expected an object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApplicationError::MalformedResponse(format!("departures JSON: {e}")))
    }

    fn departure(index: usize, raw: SmartDeparture) -> Option<Departure> {
        let time = match raw.time.parse::<ClockTime>() {
            Ok(time) => time,
            Err(e) => {
                warn!(time = %raw.time, error = %e, "Skipping departure with unreadable time");
                return None;
            },
        };

        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("smart-{index}"));
        let line = scalar_text(&raw.line).unwrap_or_default();
        let delay = raw
            .delay
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let status = parse_status(raw.status.as_deref(), delay.as_deref());

        let mut departure = Departure::new(id, line, raw.destination.trim(), time)
            .with_platform(raw.platform.as_ref().and_then(scalar_text));
        departure.delay = delay;
        departure.status = status;
        Some(departure)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::ports::{MockGroundedRetrievalPort, RetrievalAnswer};

    fn options() -> SearchOptions {
        SearchOptions::new(
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        )
    }

    fn answering(text: &str, citations: Vec<GroundingSource>) -> SmartNetworkService {
        let text = text.to_string();
        let mut retrieval = MockGroundedRetrievalPort::new();
        retrieval.expect_retrieve().times(1).returning(move |_| {
            Ok(RetrievalAnswer {
                text: text.clone(),
                citations: citations.clone(),
            })
        });
        SmartNetworkService::new(Arc::new(retrieval))
    }

    #[tokio::test]
    async fn parses_departures_and_adds_portal_source() {
        let service = answering(
            r#"{"departures":[
                {"id":"a","line":"7","destination":"Vanderkindere","time":"08:34","delay":null,"status":"on-time"},
                {"line":81,"destination":"Montgomery","time":"08:41","delay":"+2 min","status":"delayed"}
            ]}"#,
            vec![],
        );

        let result = service
            .fetch("Gare Centrale", Network::Stib, None, &options())
            .await
            .unwrap();

        assert_eq!(result.departures.len(), 2);
        assert_eq!(result.departures[0].id, "a");
        assert_eq!(result.departures[0].time.to_string(), "08:34");
        assert_eq!(result.departures[1].id, "smart-1");
        assert_eq!(result.departures[1].line, "81");
        assert_eq!(result.departures[1].delay.as_deref(), Some("+2 min"));
        assert_eq!(result.departures[1].status, DepartureStatus::Delayed);
        assert!(result.departures.iter().all(|d| d.legs.is_empty() && d.arrival_time.is_none()));

        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].uri, "https://www.stib-mivb.be");
        assert_eq!(result.sources[0].title, "Portail officiel STIB");
    }

    #[tokio::test]
    async fn non_json_text_is_a_hard_error() {
        let service = answering("Désolé, je ne trouve pas cet arrêt.", vec![]);
        let err = service
            .fetch("Nulle Part", Network::DeLijn, None, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn wrong_shaped_json_is_a_hard_error() {
        for text in [
            r#"{"error":"no data found"}"#,
            "[]",
            r#"[[]]"#,
            r#"{"result":[{"line":"7"}]}"#,
        ] {
            let service = answering(text, vec![]);
            let err = service
                .fetch("Merode", Network::Stib, None, &options())
                .await
                .unwrap_err();
            assert!(
                matches!(err, ApplicationError::MalformedResponse(_)),
                "{text} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn all_unreadable_times_is_a_hard_error() {
        let service = answering(
            r#"{"departures":[
                {"line":"1","destination":"A","time":"bientôt","status":"on-time"},
                {"line":"2","destination":"B","time":"?","status":"on-time"}
            ]}"#,
            vec![],
        );
        let err = service
            .fetch("Merode", Network::Stib, None, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let service = answering(
            "```json\n{\"departures\":[{\"line\":\"1\",\"destination\":\"Stockel\",\"time\":\"09:00\",\"status\":\"ontime\"}]}\n```",
            vec![],
        );
        let result = service
            .fetch("Merode", Network::Stib, None, &options())
            .await
            .unwrap();
        assert_eq!(result.departures.len(), 1);
        assert_eq!(result.departures[0].status, DepartureStatus::OnTime);
    }

    #[tokio::test]
    async fn empty_departures_is_a_valid_result() {
        let service = answering(r#"{"departures":[]}"#, vec![]);
        let result = service
            .fetch("Merode", Network::Stib, None, &options())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn unreadable_times_are_skipped() {
        let service = answering(
            r#"{"departures":[
                {"line":"1","destination":"A","time":"bientôt","status":"on-time"},
                {"line":"2","destination":"B","time":"10:05","status":"cancelled"}
            ]}"#,
            vec![],
        );
        let result = service
            .fetch("Merode", Network::Stib, None, &options())
            .await
            .unwrap();
        assert_eq!(result.departures.len(), 1);
        assert_eq!(result.departures[0].line, "2");
        assert_eq!(result.departures[0].status, DepartureStatus::Cancelled);
    }

    #[tokio::test]
    async fn citations_are_deduplicated_by_uri() {
        let service = answering(
            r#"{"departures":[]}"#,
            vec![
                GroundingSource::new("Horaires", "https://www.delijn.be/fr/haltes/1"),
                GroundingSource::new("Doublon", "https://www.delijn.be/fr/haltes/1"),
                GroundingSource::new("Portail", "https://www.delijn.be"),
                GroundingSource::new("Autre", "https://example.org/x"),
            ],
        );
        let result = service
            .fetch("Gent Zuid", Network::DeLijn, None, &options())
            .await
            .unwrap();

        let uris: Vec<_> = result.sources.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "https://www.delijn.be",
                "https://www.delijn.be/fr/haltes/1",
                "https://example.org/x"
            ]
        );
    }

    #[tokio::test]
    async fn request_is_grounded_and_schema_constrained() {
        let mut retrieval = MockGroundedRetrievalPort::new();
        retrieval
            .expect_retrieve()
            .withf(|q| {
                q.grounded
                    && q.prompt.contains("Merode")
                    && q.prompt.contains("stib-mivb.be")
                    && q.prompt.contains("2026-01-15 08:30")
                    && q.prompt.contains("Stockel")
                    && q.schema["required"][0] == "departures"
                    && q.system_instruction.as_deref().is_some_and(|s| s.contains("STIB"))
            })
            .times(1)
            .returning(|_| {
                Ok(RetrievalAnswer {
                    text: r#"{"departures":[]}"#.into(),
                    citations: vec![],
                })
            });

        let service = SmartNetworkService::new(Arc::new(retrieval));
        service
            .fetch("Merode", Network::Stib, Some("Stockel"), &options())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn retrieval_errors_propagate() {
        let mut retrieval = MockGroundedRetrievalPort::new();
        retrieval
            .expect_retrieve()
            .returning(|_| Err(ApplicationError::RateLimited));
        let service = SmartNetworkService::new(Arc::new(retrieval));

        let err = service
            .fetch("Merode", Network::Stib, None, &options())
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn status_falls_back_to_delay_presence() {
        assert_eq!(parse_status(None, Some("+3 min")), DepartureStatus::Delayed);
        assert_eq!(parse_status(None, None), DepartureStatus::OnTime);
        assert_eq!(parse_status(Some("Canceled"), None), DepartureStatus::Cancelled);
        assert_eq!(parse_status(Some("on_time"), None), DepartureStatus::OnTime);
    }
}
