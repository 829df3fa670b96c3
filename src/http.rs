//! Blocking HTTP access to the external lookups, behind a trait so tests can
//! swap in canned responses.

pub const DEFAULT_USER_AGENT: &str = concat!("skywatch/", env!("CARGO_PKG_VERSION"));

pub trait HttpClient: Send + Sync {
    /// Performs a GET and returns the body of a 2xx response.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    Transport(String),
    Status { status: u16, url: String },
    Decode(String),
}

impl HttpError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::Status { status: 404, .. })
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, HttpError::Status { status: 429, .. })
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::Transport(message) => write!(f, "Request failed: {message}"),
            HttpError::Status { status, url } => write!(f, "HTTP {status} from {url}"),
            HttpError::Decode(message) => write!(f, "Failed to decode response: {message}"),
        }
    }
}
impl std::error::Error for HttpError {}

/// Decodes a JSON body, mapping failures onto [`HttpError::Decode`].
pub fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::Decode(e.to_string()))
}

#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: std::time::Duration, user_agent: &str) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        log::trace!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| HttpError::Transport(format!("Failed to read response: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{HttpClient, HttpError};

    /// Serves canned responses keyed by exact URL; unknown URLs answer 404.
    #[derive(Default)]
    pub struct FakeHttpClient {
        responses: std::collections::HashMap<String, Result<Vec<u8>, HttpError>>,
        requests: std::sync::Mutex<Vec<String>>,
    }

    impl FakeHttpClient {
        pub fn new() -> Self {
            FakeHttpClient::default()
        }

        pub fn with_json(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Ok(body.as_bytes().to_vec()));
            self
        }

        pub fn with_status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(
                url.to_string(),
                Err(HttpError::Status {
                    status,
                    url: url.to_string(),
                }),
            );
            self
        }

        pub fn with_transport_error(mut self, url: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                Err(HttpError::Transport(String::from("connection refused"))),
            );
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for FakeHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| {
                    Err(HttpError::Status {
                        status: 404,
                        url: url.to_string(),
                    })
                })
        }
    }
}
