use crate::geometry::Coordinate;
use crate::types::IcaoAddress;

pub const UNKNOWN_CALLSIGN: &str = "UNKNOWN";

/// One aircraft as the rest of the pipeline sees it: feed quirks resolved,
/// geometry relative to the reference location computed, and (once enriched)
/// the best-effort lookup results attached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Observation {
    pub icao: IcaoAddress,
    pub callsign: String,
    pub registration: String,
    pub type_designator: String,
    pub description: String,
    pub position: Coordinate,
    /// Barometric altitude in feet, finite and never negative.
    pub altitude_feet: f64,
    /// Ground speed in knots.
    pub speed_knots: i64,
    pub heading: f64,
    pub distance_km: i64,
    pub bearing_from_location: f64,
    pub bearing_from_aircraft: f64,
    pub military: bool,
    pub on_ground: bool,
    pub inbound: bool,
    pub tracker_url: String,
    pub country: String,
    pub cloud_coverage: i32,
    pub image: AircraftImage,
    pub route: Option<FlightRoute>,
}

impl Observation {
    #[must_use]
    pub fn military_label(&self) -> &'static str {
        if self.military {
            "true"
        } else {
            "false"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct AircraftImage {
    pub thumbnail_url: String,
    pub url: String,
    pub photographer: String,
}

impl AircraftImage {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thumbnail_url.is_empty() && self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct FlightRoute {
    pub airline: String,
    pub origin: String,
    pub destination: String,
}

/// Closest aircraft first.
pub fn sort_by_distance(observations: &mut [Observation]) {
    observations.sort_by_key(|observation| observation.distance_km);
}


#[cfg(test)]
mod tests {
    use super::fixtures::observation;
    use super::sort_by_distance;

    #[test]
    fn when_sorting_by_distance_then_closest_aircraft_comes_first() {
        let mut far = observation("a00001", "APEX11");
        far.distance_km = 120;
        let mut middle = observation("a00002", "APEX12");
        middle.distance_km = 60;
        let mut near = observation("a00003", "APEX13");
        near.distance_km = 10;
        let mut observations = vec![far, middle, near];

        sort_by_distance(&mut observations);

        let callsigns: Vec<&str> = observations.iter().map(|o| o.callsign.as_str()).collect();
        assert_eq!(callsigns, vec!["APEX13", "APEX12", "APEX11"]);
    }
}
