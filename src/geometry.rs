pub const EARTH_RADIUS_KM: f64 = 6378.137;

const KILOMETERS_PER_NAUTICAL_MILE: f64 = 1.852;
const METERS_PER_FOOT: f64 = 0.3048;

#[derive(Debug, PartialEq, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({0:.5}, {1:.5})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points using the haversine formula,
/// truncated to whole kilometers.
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> i64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    #[allow(clippy::cast_possible_truncation)]
    let kilometers = (EARTH_RADIUS_KM * c) as i64;
    kilometers
}

/// Forward azimuth from `from` to `to` in degrees, normalized to `[0, 360)`.
///
/// This is not symmetric: `bearing(a, b)` and `bearing(b, a)` differ by more
/// than 180 degrees on anything but a meridian or the equator, so each
/// direction has to be computed on its own.
#[must_use]
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let mut degrees = y.atan2(x).to_degrees() + 360.0;
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}

/// Smallest angle between two headings, in `[0, 180]`.
#[must_use]
pub fn circular_difference(a: f64, b: f64) -> f64 {
    let difference = (a - b).abs() % 360.0;
    difference.min(360.0 - difference)
}

/// Whether an aircraft at `aircraft_position` flying `track` is heading
/// towards `location` within `margin_degrees`.
///
/// Callers must not ask this for aircraft on the ground; see
/// [`crate::observation::Observation::on_ground`].
#[must_use]
pub fn is_inbound(
    location: Coordinate,
    aircraft_position: Coordinate,
    track: f64,
    margin_degrees: f64,
) -> bool {
    let bearing_to_location = bearing(aircraft_position, location);
    circular_difference(bearing_to_location, track) <= margin_degrees
}

#[must_use]
pub fn knots_to_kmh(knots: i64) -> i64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let kmh = (knots as f64 * KILOMETERS_PER_NAUTICAL_MILE) as i64;
    kmh
}

#[must_use]
pub fn feet_to_meters(feet: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let meters = (feet * METERS_PER_FOOT) as i64;
    meters
}

#[must_use]
pub fn km_to_nautical_miles(kilometers: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nautical_miles = (f64::from(kilometers) / KILOMETERS_PER_NAUTICAL_MILE) as u32;
    nautical_miles
}

/// Smallest whole number of nautical miles whose radius still reaches `kilometers`.
#[must_use]
pub fn km_to_nautical_miles_covering(kilometers: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nautical_miles = (f64::from(kilometers) / KILOMETERS_PER_NAUTICAL_MILE).ceil() as u32;
    nautical_miles
}
