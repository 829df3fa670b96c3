/// Transponder identity as reported by the feed (`hex`), lower-cased.
///
/// Non-ICAO addresses (TIS-B, anonymised) arrive with a leading `~` and are
/// kept verbatim so they never collide with a real 24-bit address.
#[derive(Debug, PartialEq, Clone, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct IcaoAddress(String);

impl IcaoAddress {
    pub fn new(value: &str) -> Result<Self, IcaoAddressError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IcaoAddressError::Empty);
        }
        let hex_digits = trimmed.strip_prefix('~').unwrap_or(trimmed);
        if hex_digits.is_empty() || !hex_digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IcaoAddressError::InvalidHexFormat(trimmed.to_string()));
        }
        Ok(IcaoAddress(trimmed.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IcaoAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub enum IcaoAddressError {
    Empty,
    InvalidHexFormat(String),
}
impl std::fmt::Display for IcaoAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IcaoAddressError::Empty => write!(f, "Empty ICAO address"),
            IcaoAddressError::InvalidHexFormat(value) => {
                write!(f, "Invalid hexadecimal ICAO address '{value}'")
            }
        }
    }
}
impl std::error::Error for IcaoAddressError {}
