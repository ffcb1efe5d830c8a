//! Property-based tests for the departure model
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    ClockTime, Departure, DepartureStatus, GroundingSource, Leg, Network, SearchResult,
    delay_label,
};
use std::collections::HashSet;

use proptest::prelude::*;

fn clock(hour: u32, minute: u32) -> ClockTime {
    ClockTime::from_hm(hour, minute).unwrap()
}

mod clock_time_tests {
    use super::*;

    proptest! {
        #[test]
        fn renders_zero_padded(hour in 0u32..24, minute in 0u32..60) {
            let rendered = clock(hour, minute).to_string();
            prop_assert_eq!(rendered.len(), 5);
            prop_assert_eq!(&rendered[2..3], ":");
            prop_assert_eq!(rendered, format!("{hour:02}:{minute:02}"));
        }

        #[test]
        fn french_form_matches_colon_form(hour in 0u32..24, minute in 0u32..60) {
            let colon: ClockTime = format!("{hour:02}:{minute:02}").parse().unwrap();
            let french: ClockTime = format!("{hour}h{minute:02}").parse().unwrap();
            prop_assert_eq!(colon, french);
        }

        #[test]
        fn out_of_range_is_rejected(hour in 24u32..100, minute in 0u32..60) {
            prop_assert!(ClockTime::from_hm(hour, minute).is_err());
        }
    }
}

mod delay_tests {
    use super::*;

    proptest! {
        #[test]
        fn label_uses_whole_minutes(delay in 1i64..86_400) {
            prop_assert_eq!(delay_label(delay), Some(format!("+{} min", delay / 60)));
        }

        #[test]
        fn no_label_when_not_late(delay in -3_600i64..=0) {
            prop_assert_eq!(delay_label(delay), None);
        }

        #[test]
        fn cancellation_wins_over_delay(delay in -600i64..86_400) {
            prop_assert_eq!(
                DepartureStatus::from_service_state(delay, true),
                DepartureStatus::Cancelled
            );
        }

        #[test]
        fn delayed_iff_positive(delay in -600i64..86_400) {
            let status = DepartureStatus::from_service_state(delay, false);
            prop_assert_eq!(status == DepartureStatus::Delayed, delay > 0);
        }
    }
}

mod network_tests {
    use super::*;

    proptest! {
        #[test]
        fn id_parses_back_in_any_case(index in 0usize..3, upper in any::<bool>()) {
            let network = Network::ALL[index];
            let id = if upper { network.id().to_uppercase() } else { network.id().to_string() };
            prop_assert_eq!(id.parse::<Network>().unwrap(), network);
        }
    }
}

mod search_result_tests {
    use super::*;

    proptest! {
        #[test]
        fn sources_stay_unique(uris in prop::collection::vec("[a-d]", 0..20)) {
            let mut result = SearchResult::default();
            for uri in &uris {
                result.push_source(GroundingSource::new("t", format!("https://{uri}.be")));
            }

            let distinct: HashSet<&String> = uris.iter().collect();
            prop_assert_eq!(result.sources.len(), distinct.len());
            for pair in result.sources.windows(2) {
                prop_assert_ne!(&pair[0].uri, &pair[1].uri);
            }
        }
    }
}

mod itinerary_tests {
    use super::*;

    fn leg(from: &str, dep: (u32, u32), to: &str, arr: (u32, u32), line: &str) -> Leg {
        Leg {
            line: line.to_string(),
            departure_station: from.to_string(),
            departure_time: clock(dep.0, dep.1),
            arrival_station: to.to_string(),
            arrival_time: clock(arr.0, arr.1),
            platform: None,
            delay: None,
        }
    }

    proptest! {
        #[test]
        fn chained_legs_take_first_time_and_last_destination(
            wait in 0u32..30,
            delay in 0i64..1_200,
        ) {
            let legs = vec![
                leg("Bruxelles-Midi", (8, 0), "Gent-Sint-Pieters", (8, 30), "IC1"),
                leg("Gent-Sint-Pieters", (8, 30 + wait), "Brugge", (9, 0), "IC2"),
            ];

            let departure = Departure::itinerary("conn-0", legs, delay, false).unwrap();

            prop_assert_eq!(departure.time, clock(8, 0));
            prop_assert_eq!(departure.destination.as_str(), "Brugge");
            prop_assert_eq!(departure.arrival_time, Some(clock(9, 0)));
            prop_assert!(departure.has_interchange());
            prop_assert_eq!(
                departure.status,
                DepartureStatus::from_service_state(delay, false)
            );
        }

        #[test]
        fn broken_chain_is_rejected(wait in 0u32..30) {
            let legs = vec![
                leg("Bruxelles-Midi", (8, 0), "Gent-Sint-Pieters", (8, 30), "IC1"),
                leg("Oostende", (8, 30 + wait), "Brugge", (9, 0), "IC2"),
            ];

            prop_assert!(Departure::itinerary("conn-0", legs, 0, false).is_err());
        }
    }
}
