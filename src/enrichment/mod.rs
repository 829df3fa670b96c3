//! Best-effort lookups attached to observations before they are reported.
//!
//! Each lookup is independent: a failing service leaves its own fields at
//! their zero value and never drops the observation or stops the others.

pub mod country;
pub mod imagery;
pub mod route;
pub mod weather;

use crate::geometry::Coordinate;
use crate::observation::Observation;
use country::country_for_registration;
use imagery::ImageClient;
use route::RouteClient;
use weather::{cloud_coverage, CloudForecast, WeatherClient};

pub struct Enricher {
    location: Coordinate,
    weather: WeatherClient,
    images: ImageClient,
    routes: RouteClient,
}

impl Enricher {
    #[must_use]
    pub fn new(
        location: Coordinate,
        weather: WeatherClient,
        images: ImageClient,
        routes: RouteClient,
    ) -> Self {
        Enricher {
            location,
            weather,
            images,
            routes,
        }
    }

    /// Reduced detail for the scan-range snapshot: no network access.
    pub fn enrich_light(observations: &mut [Observation]) {
        for observation in observations {
            observation.country = country_for_registration(&observation.registration);
        }
    }

    /// Fetches the forecast once for the whole batch.
    fn cloud_forecast(&self) -> Option<CloudForecast> {
        match self.weather.fetch_cloud_forecast(self.location) {
            Ok(forecast) => Some(forecast),
            Err(err) if err.is_rate_limited() => {
                log::debug!("Weather lookup rate limited");
                None
            }
            Err(err) => {
                log::warn!("Weather lookup failed, cloud coverage left empty: {err}");
                None
            }
        }
    }

    /// Full enrichment for aircraft about to be reported.
    #[must_use]
    pub fn enrich(&self, mut observations: Vec<Observation>, hour_utc: usize) -> Vec<Observation> {
        if observations.is_empty() {
            return observations;
        }

        let forecast = self.cloud_forecast();
        for observation in &mut observations {
            observation.country = country_for_registration(&observation.registration);
            observation.cloud_coverage = forecast
                .as_ref()
                .map_or(0, |f| cloud_coverage(f, observation.altitude_feet, hour_utc));
            observation.image = self
                .images
                .find_image(observation.icao.as_str(), &observation.registration);
            observation.route = self
                .routes
                .find_route(&observation.callsign, &observation.registration);
        }
        observations
    }
}
