use crate::enrichment::imagery::DEFAULT_PHOTOS_URL;
use crate::enrichment::route::DEFAULT_ROUTE_URL;
use crate::enrichment::weather::DEFAULT_WEATHER_URL;
use crate::feed::DEFAULT_FEED_URL;
use crate::filter::ALL_TYPES;
use crate::geometry::Coordinate;
use crate::http::DEFAULT_USER_AGENT;

/// Below this the public feeds start answering 429.
const RECOMMENDED_MIN_FETCH_INTERVAL_SECONDS: u64 = 60;

#[derive(Debug, serde::Deserialize)]
pub struct ApplicationConfig {
    pub location: Coordinate,
    #[serde(default)]
    pub spotter: SpotterConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        Self::from_toml_str(&string).map_err(|error| match error {
            errors::ApplicationConfigError::Parse { source, .. } => {
                errors::ApplicationConfigError::Parse {
                    source,
                    path: path.clone(),
                }
            }
            other => other,
        })
    }

    /// Parses and validates a config held in memory.
    pub fn from_toml_str(string: &str) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let config: ApplicationConfig =
            toml::from_str(string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: std::path::PathBuf::new(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), errors::ApplicationConfigError> {
        let invalid = |message: String| Err(errors::ApplicationConfigError::Invalid(message));

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return invalid(format!(
                "latitude {0} is outside [-90, 90]",
                self.location.latitude
            ));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return invalid(format!(
                "longitude {0} is outside [-180, 180]",
                self.location.longitude
            ));
        }
        if self.spotter.scan_range_km() < self.spotter.notification_range_km {
            return invalid(format!(
                "scan_range_km ({0}) must not be smaller than notification_range_km ({1})",
                self.spotter.scan_range_km(),
                self.spotter.notification_range_km
            ));
        }
        if self.spotter.aircraft_types().is_empty() {
            return invalid(String::from("aircraft_types must list at least one type"));
        }
        if self.spotter.fetch_interval_seconds == 0 {
            return invalid(String::from("fetch_interval_seconds must be positive"));
        }
        if self.spotter.fetch_interval_seconds < RECOMMENDED_MIN_FETCH_INTERVAL_SECONDS {
            log::warn!(
                "fetch_interval_seconds is {0}; intervals under {RECOMMENDED_MIN_FETCH_INTERVAL_SECONDS} s are likely to be rate limited",
                self.spotter.fetch_interval_seconds
            );
        }
        Ok(())
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct SpotterConfig {
    pub notification_range_km: u32,
    scan_range_km: Option<u32>,
    aircraft_types: Vec<String>,
    pub max_altitude_feet: u32,
    pub fetch_interval_seconds: u64,
    pub inbound_margin_degrees: f64,
    pub log_new_planes_to_console: bool,
}

impl SpotterConfig {
    /// Falls back to the notification range when not set.
    #[must_use]
    pub fn scan_range_km(&self) -> u32 {
        self.scan_range_km.unwrap_or(self.notification_range_km)
    }

    /// Identifiers upper-cased with whitespace removed; blanks are dropped.
    #[must_use]
    pub fn aircraft_types(&self) -> Vec<String> {
        self.aircraft_types
            .iter()
            .map(|t| {
                t.chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_uppercase()
            })
            .filter(|t| !t.is_empty())
            .collect()
    }

    #[must_use]
    pub fn fetch_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_interval_seconds)
    }
}

impl Default for SpotterConfig {
    fn default() -> Self {
        SpotterConfig {
            notification_range_km: 30,
            scan_range_km: None,
            aircraft_types: vec![ALL_TYPES.to_string()],
            max_altitude_feet: 0,
            fetch_interval_seconds: 60,
            inbound_margin_degrees: 10.0,
            log_new_planes_to_console: true,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub feed_url: String,
    pub weather_url: String,
    pub photos_url: String,
    pub route_url: String,
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            photos_url: DEFAULT_PHOTOS_URL.to_string(),
            route_url: DEFAULT_ROUTE_URL.to_string(),
        }
    }
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
        Invalid(String),
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Invalid(message) => {
                    write!(f, "Invalid configuration: {message}")
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
                ApplicationConfigError::Invalid(_) => None,
            }
        }
    }
}
