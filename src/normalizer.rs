use crate::feed::{RawAltitude, RawObservation};
use crate::geometry::{bearing, distance_km, is_inbound, Coordinate};
use crate::observation::{AircraftImage, Observation, UNKNOWN_CALLSIGN};
use crate::types::{IcaoAddress, IcaoAddressError};

const TRACKER_BASE_URL: &str = "https://globe.adsbexchange.com/?icao=";

/// Where the observer stands and how generous the inbound test is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub location: Coordinate,
    pub inbound_margin_degrees: f64,
}

#[derive(Debug, PartialEq)]
pub enum NormalizeError {
    InvalidIcao(IcaoAddressError),
    MissingRegistration { icao: String },
    MissingPosition { icao: String },
}
impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::InvalidIcao(error) => write!(f, "{error}"),
            NormalizeError::MissingRegistration { icao } => {
                write!(f, "Aircraft {icao} has no registration")
            }
            NormalizeError::MissingPosition { icao } => {
                write!(f, "Aircraft {icao} has no position")
            }
        }
    }
}
impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NormalizeError::InvalidIcao(error) => Some(error),
            _ => None,
        }
    }
}

#[must_use]
pub fn normalize_callsign(callsign: &str) -> String {
    let trimmed = callsign.trim();
    if trimmed.is_empty() {
        String::from(UNKNOWN_CALLSIGN)
    } else {
        trimmed.to_string()
    }
}

/// Collapses the feed's altitude shapes into finite, non-negative feet.
#[must_use]
pub fn normalize_altitude(altitude: &RawAltitude) -> f64 {
    let feet = match altitude {
        RawAltitude::Feet(feet) => *feet,
        RawAltitude::Sentinel(value) => value.trim().parse::<f64>().unwrap_or(0.0),
        RawAltitude::Missing => 0.0,
    };
    if feet.is_finite() {
        feet.max(0.0)
    } else {
        0.0
    }
}

pub fn normalize(
    raw: &RawObservation,
    reference: &Reference,
) -> Result<Observation, NormalizeError> {
    let icao = IcaoAddress::new(&raw.icao).map_err(NormalizeError::InvalidIcao)?;

    let registration = raw.registration.trim();
    if registration.is_empty() {
        return Err(NormalizeError::MissingRegistration {
            icao: icao.to_string(),
        });
    }

    let (Some(latitude), Some(longitude)) = (raw.lat, raw.lon) else {
        return Err(NormalizeError::MissingPosition {
            icao: icao.to_string(),
        });
    };
    let position = Coordinate::new(latitude, longitude);

    let altitude_feet = normalize_altitude(&raw.altitude);
    let on_ground = altitude_feet == 0.0;
    let heading = raw.track.unwrap_or(0.0);
    let inbound = !on_ground
        && is_inbound(
            reference.location,
            position,
            heading,
            reference.inbound_margin_degrees,
        );

    #[allow(clippy::cast_possible_truncation)]
    let speed_knots = raw.ground_speed.unwrap_or(0.0) as i64;

    Ok(Observation {
        tracker_url: format!("{TRACKER_BASE_URL}{icao}"),
        icao,
        callsign: normalize_callsign(&raw.callsign),
        registration: registration.to_string(),
        type_designator: raw.type_designator.trim().to_string(),
        description: raw.description.trim().to_string(),
        position,
        altitude_feet,
        speed_knots,
        heading,
        distance_km: distance_km(reference.location, position),
        bearing_from_location: bearing(reference.location, position),
        bearing_from_aircraft: bearing(position, reference.location),
        military: raw.is_military(),
        on_ground,
        inbound,
        country: String::new(),
        cloud_coverage: 0,
        image: AircraftImage::default(),
        route: None,
    })
}

/// Normalizes a whole feed batch, dropping records that cannot be tracked.
#[must_use]
pub fn normalize_all(raws: &[RawObservation], reference: &Reference) -> Vec<Observation> {
    raws.iter()
        .filter_map(|raw| match normalize(raw, reference) {
            Ok(observation) => Some(observation),
            Err(err) => {
                log::debug!("Dropping feed record: {err}");
                None
            }
        })
        .collect()
}
