use crate::geometry::{km_to_nautical_miles_covering, Coordinate};
use crate::http::{decode_json, HttpClient, HttpError};

pub const DEFAULT_FEED_URL: &str = "https://api.adsb.one/v2/point";

/// Military / special-interest bit of `dbFlags`.
pub const MILITARY_FLAG: u32 = 0b1;

/// Barometric altitude exactly as the feed sends it: a number of feet, a
/// string sentinel such as `"ground"`, or nothing at all.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(untagged)]
pub enum RawAltitude {
    Feet(f64),
    Sentinel(String),
    #[default]
    Missing,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawObservation {
    #[serde(rename = "hex")]
    pub icao: String,
    #[serde(rename = "flight")]
    pub callsign: String,
    #[serde(rename = "r")]
    pub registration: String,
    #[serde(rename = "t")]
    pub type_designator: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "alt_baro")]
    pub altitude: RawAltitude,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "gs")]
    pub ground_speed: Option<f64>,
    pub track: Option<f64>,
    #[serde(rename = "dbFlags")]
    pub db_flags: u32,
}

impl RawObservation {
    #[must_use]
    pub fn is_military(&self) -> bool {
        self.db_flags & MILITARY_FLAG != 0
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FeedResponse {
    ac: Option<Vec<RawObservation>>,
    msg: String,
    total: Option<u64>,
}

#[derive(Debug)]
pub enum FeedError {
    Http(HttpError),
    Rejected(String),
}
impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Http(error) => write!(f, "Aircraft feed unavailable: {error}"),
            FeedError::Rejected(message) => write!(f, "Aircraft feed rejected query: {message}"),
        }
    }
}
impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Http(error) => Some(error),
            FeedError::Rejected(_) => None,
        }
    }
}

/// Point-radius query against an ADS-B aggregator (`/v2/point/<lat>/<lon>/<nm>`).
pub struct AdsbFeed {
    http: std::sync::Arc<dyn HttpClient>,
    base_url: String,
}

impl AdsbFeed {
    #[must_use]
    pub fn new(http: std::sync::Arc<dyn HttpClient>, base_url: &str) -> Self {
        AdsbFeed {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn point_url(&self, location: Coordinate, range_km: u32) -> String {
        format!(
            "{0}/{1}/{2}/{3}",
            self.base_url,
            location.latitude,
            location.longitude,
            km_to_nautical_miles_covering(range_km)
        )
    }

    pub fn fetch(
        &self,
        location: Coordinate,
        range_km: u32,
    ) -> Result<Vec<RawObservation>, FeedError> {
        let body = self
            .http
            .get(&self.point_url(location, range_km))
            .map_err(FeedError::Http)?;
        let response: FeedResponse = decode_json(&body).map_err(FeedError::Http)?;

        match response.ac {
            Some(aircraft) => {
                log::debug!(
                    "Feed returned {0} aircraft (reported total {1:?})",
                    aircraft.len(),
                    response.total
                );
                Ok(aircraft)
            }
            None if response.msg.is_empty() || response.msg == "No error" => Ok(Vec::new()),
            None => Err(FeedError::Rejected(response.msg)),
        }
    }
}
