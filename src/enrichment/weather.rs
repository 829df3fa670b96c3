use crate::geometry::{feet_to_meters, Coordinate};
use crate::http::{decode_json, HttpClient, HttpError};

pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

const LOW_BAND_CEILING_METERS: i64 = 3000;
const MID_BAND_CEILING_METERS: i64 = 8000;

/// Hourly cloud cover percentages for the current UTC day, indexed by hour.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
pub struct CloudForecast {
    pub hourly: HourlyCloudCover,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct HourlyCloudCover {
    pub time: Vec<String>,
    pub cloudcover_low: Vec<Option<i32>>,
    pub cloudcover_mid: Vec<Option<i32>>,
    pub cloudcover_high: Vec<Option<i32>>,
}

fn value_at(values: &[Option<i32>], hour: usize) -> i32 {
    values.get(hour).copied().flatten().unwrap_or(0)
}

#[must_use]
pub fn highest_value(values: &[i32]) -> i32 {
    values.iter().copied().max().unwrap_or(0)
}

/// Cloud cover an observer on the ground has to look through to see an
/// aircraft at `altitude_feet`.
///
/// Below 3000 m only the low layer counts. Higher up, the worst of every
/// layer up to and including the aircraft's own band is used.
#[must_use]
pub fn cloud_coverage(forecast: &CloudForecast, altitude_feet: f64, hour_utc: usize) -> i32 {
    let hourly = &forecast.hourly;
    let low = value_at(&hourly.cloudcover_low, hour_utc);
    let altitude_meters = feet_to_meters(altitude_feet);

    if altitude_meters < LOW_BAND_CEILING_METERS {
        return low;
    }
    let mid = value_at(&hourly.cloudcover_mid, hour_utc);
    if altitude_meters < MID_BAND_CEILING_METERS {
        return highest_value(&[low, mid]);
    }
    let high = value_at(&hourly.cloudcover_high, hour_utc);
    highest_value(&[low, mid, high])
}

pub struct WeatherClient {
    http: std::sync::Arc<dyn HttpClient>,
    base_url: String,
}

impl WeatherClient {
    #[must_use]
    pub fn new(http: std::sync::Arc<dyn HttpClient>, base_url: &str) -> Self {
        WeatherClient {
            http,
            base_url: base_url.to_string(),
        }
    }

    #[must_use]
    pub fn forecast_url(&self, location: Coordinate) -> String {
        format!(
            "{0}?latitude={1:.6}&longitude={2:.6}&hourly=cloudcover_low,cloudcover_mid,cloudcover_high&timezone=GMT&forecast_days=1",
            self.base_url, location.latitude, location.longitude
        )
    }

    pub fn fetch_cloud_forecast(&self, location: Coordinate) -> Result<CloudForecast, HttpError> {
        let body = self.http.get(&self.forecast_url(location))?;
        decode_json(&body)
    }
}
