use crate::http::{decode_json, HttpClient, HttpError};
use crate::observation::{FlightRoute, UNKNOWN_CALLSIGN};

pub const DEFAULT_ROUTE_URL: &str = "https://api.adsbdb.com/v0/callsign";

#[derive(Debug, serde::Deserialize)]
struct RouteResponse {
    response: RouteBody,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum RouteBody {
    Found { flightroute: RouteCandidate },
    Message(String),
}

/// Route as published for a callsign, before it is checked against the
/// aircraft actually flying that callsign.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct RouteCandidate {
    pub callsign: String,
    pub callsign_icao: String,
    pub airline: Option<Airline>,
    pub origin: Option<Airport>,
    pub destination: Option<Airport>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct Airline {
    pub name: String,
    pub icao: String,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct Airport {
    pub name: String,
    pub municipality: String,
    pub iata_code: String,
}

impl Airport {
    fn label(&self) -> String {
        match (self.municipality.is_empty(), self.iata_code.is_empty()) {
            (false, false) => format!("{0} ({1})", self.municipality, self.iata_code),
            (false, true) => self.municipality.clone(),
            _ => self.name.clone(),
        }
    }
}

impl From<RouteCandidate> for FlightRoute {
    fn from(candidate: RouteCandidate) -> Self {
        FlightRoute {
            airline: candidate.airline.map(|a| a.name).unwrap_or_default(),
            origin: candidate.origin.map(|a| a.label()).unwrap_or_default(),
            destination: candidate.destination.map(|a| a.label()).unwrap_or_default(),
        }
    }
}

fn first_three_upper(value: &str) -> String {
    value.chars().take(3).collect::<String>().to_ascii_uppercase()
}

/// Placeholder and very short callsigns never have a published route.
#[must_use]
pub fn should_lookup_route(callsign: &str) -> bool {
    callsign != UNKNOWN_CALLSIGN && callsign.chars().count() > 3
}

/// Heuristic check that a published route belongs to this aircraft.
///
/// Accepted when the airline ICAO code prefixes the callsign's first three
/// characters, when the registration (hyphens removed) appears inside the
/// callsign, or when the route's ICAO callsign shares the first three
/// characters with the callsign.
#[must_use]
pub fn validate_route(callsign: &str, registration: &str, candidate: &RouteCandidate) -> bool {
    let callsign_upper = callsign.to_ascii_uppercase();
    let callsign_prefix = first_three_upper(callsign);

    let airline_matches = candidate.airline.as_ref().is_some_and(|airline| {
        !airline.icao.is_empty() && callsign_prefix.starts_with(&airline.icao.to_ascii_uppercase())
    });

    let bare_registration = registration.replace('-', "").to_ascii_uppercase();
    let registration_matches =
        !bare_registration.is_empty() && callsign_upper.contains(&bare_registration);

    let icao_callsign_matches = candidate.callsign_icao.chars().count() >= 3
        && callsign_prefix.chars().count() == 3
        && first_three_upper(&candidate.callsign_icao) == callsign_prefix;

    airline_matches || registration_matches || icao_callsign_matches
}

pub struct RouteClient {
    http: std::sync::Arc<dyn HttpClient>,
    base_url: String,
}

impl RouteClient {
    #[must_use]
    pub fn new(http: std::sync::Arc<dyn HttpClient>, base_url: &str) -> Self {
        RouteClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `Ok(None)` when the service does not know the callsign.
    pub fn fetch_route(&self, callsign: &str) -> Result<Option<RouteCandidate>, HttpError> {
        let url = format!("{0}/{1}", self.base_url, callsign);
        let body = match self.http.get(&url) {
            Ok(body) => body,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        let response: RouteResponse = decode_json(&body)?;
        match response.response {
            RouteBody::Found { flightroute } => Ok(Some(flightroute)),
            RouteBody::Message(message) => {
                log::debug!("No route for {callsign}: {message}");
                Ok(None)
            }
        }
    }

    /// Looks up and validates the route; never fails.
    #[must_use]
    pub fn find_route(&self, callsign: &str, registration: &str) -> Option<FlightRoute> {
        if !should_lookup_route(callsign) {
            return None;
        }
        match self.fetch_route(callsign) {
            Ok(Some(candidate)) => {
                if validate_route(callsign, registration, &candidate) {
                    Some(FlightRoute::from(candidate))
                } else {
                    log::info!(
                        "Discarding route for {callsign} ({registration}): published for {0}",
                        candidate.callsign_icao
                    );
                    None
                }
            }
            Ok(None) => None,
            Err(err) if err.is_rate_limited() => {
                log::debug!("Route lookup for {callsign} rate limited");
                None
            }
            Err(err) => {
                log::warn!("Route lookup for {callsign} failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::FakeHttpClient;

    fn candidate(callsign_icao: &str, airline_icao: Option<&str>) -> RouteCandidate {
        RouteCandidate {
            callsign: String::new(),
            callsign_icao: callsign_icao.to_string(),
            airline: airline_icao.map(|icao| Airline {
                name: String::from("Brussels Airlines"),
                icao: icao.to_string(),
            }),
            origin: None,
            destination: None,
        }
    }

    mod when_validating_route {
        use super::*;

        #[test]
        fn and_airline_code_prefixes_callsign_then_accepted() {
            assert!(validate_route("bel7CF", "OO-SNA", &candidate("XXX1", Some("BEL"))));
        }

        #[test]
        fn and_registration_without_hyphen_is_in_callsign_then_accepted() {
            assert!(validate_route("OOSNA", "OO-SNA", &candidate("XXX1", None)));
        }

        #[test]
        fn and_icao_callsign_shares_prefix_then_accepted() {
            assert!(validate_route("BEL7CF", "OO-SNA", &candidate("BEL99", Some("DLH"))));
        }

        #[test]
        fn and_nothing_lines_up_then_rejected() {
            assert!(!validate_route("RYR12AB", "EI-DCL", &candidate("BEL7CF", Some("BEL"))));
        }

        #[test]
        fn and_airline_code_is_empty_then_it_does_not_match_everything() {
            assert!(!validate_route("RYR12AB", "EI-DCL", &candidate("", Some(""))));
        }
    }

    #[test]
    fn when_callsign_is_placeholder_or_short_then_no_lookup() {
        assert!(!should_lookup_route("UNKNOWN"));
        assert!(!should_lookup_route("BEL"));
        assert!(should_lookup_route("BEL7"));
    }

    const FOUND: &str = r#"{"response":{"flightroute":{
        "callsign":"BEL7CF","callsign_icao":"BEL7CF","callsign_iata":"SN7CF",
        "airline":{"name":"Brussels Airlines","icao":"BEL","iata":"SN","country":"Belgium"},
        "origin":{"name":"Brussels Airport","municipality":"Brussels","iata_code":"BRU","icao_code":"EBBR"},
        "destination":{"name":"Lisbon Humberto Delgado Airport","municipality":"Lisbon","iata_code":"LIS"}}}}"#;

    fn client(fake: FakeHttpClient) -> RouteClient {
        RouteClient::new(std::sync::Arc::new(fake), "http://routes")
    }

    #[test]
    fn when_route_is_found_and_valid_then_it_is_returned() {
        let client = client(FakeHttpClient::new().with_json("http://routes/BEL7CF", FOUND));

        let route = client.find_route("BEL7CF", "OO-SNA").expect("route expected");

        assert_eq!(route.airline, "Brussels Airlines");
        assert_eq!(route.origin, "Brussels (BRU)");
        assert_eq!(route.destination, "Lisbon (LIS)");
    }

    #[test]
    fn when_route_belongs_to_another_operator_then_it_is_discarded() {
        let client = client(FakeHttpClient::new().with_json("http://routes/RYR12AB", FOUND));
        assert_eq!(client.find_route("RYR12AB", "EI-DCL"), None);
    }

    #[test]
    fn when_service_answers_404_then_no_route_and_no_error() {
        let client = client(FakeHttpClient::new().with_status("http://routes/BEL7CF", 404));
        assert!(matches!(client.fetch_route("BEL7CF"), Ok(None)));
        assert_eq!(client.find_route("BEL7CF", "OO-SNA"), None);
    }

    #[test]
    fn when_service_answers_with_message_then_no_route() {
        let client = client(
            FakeHttpClient::new()
                .with_json("http://routes/BEL7CF", r#"{"response":"unknown callsign"}"#),
        );
        assert!(matches!(client.fetch_route("BEL7CF"), Ok(None)));
    }

    #[test]
    fn when_service_rate_limits_then_error_is_distinguished() {
        let client = client(FakeHttpClient::new().with_status("http://routes/BEL7CF", 429));
        assert!(client.fetch_route("BEL7CF").unwrap_err().is_rate_limited());
        assert_eq!(client.find_route("BEL7CF", "OO-SNA"), None);
    }

    #[test]
    fn when_callsign_is_unknown_then_service_is_not_called() {
        let fake = std::sync::Arc::new(FakeHttpClient::new());
        let client = RouteClient::new(fake.clone(), "http://routes");

        assert_eq!(client.find_route("UNKNOWN", "OO-SNA"), None);
        assert!(fake.requests().is_empty());
    }
}
