//! Country of registry from the registration's nationality prefix.

const REGISTRATION_PREFIXES: &[(&str, &str)] = &[
    ("2-", "Guernsey"),
    ("3A-", "Monaco"),
    ("4K-", "Azerbaijan"),
    ("4L-", "Georgia"),
    ("4O-", "Montenegro"),
    ("4R-", "Sri Lanka"),
    ("4X-", "Israel"),
    ("5A-", "Libya"),
    ("5B-", "Cyprus"),
    ("5N-", "Nigeria"),
    ("5Y-", "Kenya"),
    ("7T-", "Algeria"),
    ("9A-", "Croatia"),
    ("9H-", "Malta"),
    ("9K-", "Kuwait"),
    ("9M-", "Malaysia"),
    ("9V-", "Singapore"),
    ("A4O-", "Oman"),
    ("A6-", "United Arab Emirates"),
    ("A7-", "Qatar"),
    ("A9C-", "Bahrain"),
    ("AP-", "Pakistan"),
    ("B-", "China"),
    ("B-H", "Hong Kong"),
    ("B-K", "Hong Kong"),
    ("B-L", "Hong Kong"),
    ("B-M", "Macau"),
    ("C-", "Canada"),
    ("C6-", "Bahamas"),
    ("CC-", "Chile"),
    ("CN-", "Morocco"),
    ("CS-", "Portugal"),
    ("CX-", "Uruguay"),
    ("D-", "Germany"),
    ("E7-", "Bosnia and Herzegovina"),
    ("EC-", "Spain"),
    ("EI-", "Ireland"),
    ("EK-", "Armenia"),
    ("EP-", "Iran"),
    ("ER-", "Moldova"),
    ("ES-", "Estonia"),
    ("ET-", "Ethiopia"),
    ("EW-", "Belarus"),
    ("EX-", "Kyrgyzstan"),
    ("EY-", "Tajikistan"),
    ("EZ-", "Turkmenistan"),
    ("F-", "France"),
    ("G-", "United Kingdom"),
    ("HA-", "Hungary"),
    ("HB-", "Switzerland"),
    ("HC-", "Ecuador"),
    ("HK-", "Colombia"),
    ("HL", "South Korea"),
    ("HS-", "Thailand"),
    ("HZ-", "Saudi Arabia"),
    ("I-", "Italy"),
    ("JA", "Japan"),
    ("JY-", "Jordan"),
    ("LN-", "Norway"),
    ("LV-", "Argentina"),
    ("LX-", "Luxembourg"),
    ("LY-", "Lithuania"),
    ("LZ-", "Bulgaria"),
    ("M-", "Isle of Man"),
    ("N", "United States"),
    ("OB-", "Peru"),
    ("OD-", "Lebanon"),
    ("OE-", "Austria"),
    ("OH-", "Finland"),
    ("OK-", "Czech Republic"),
    ("OM-", "Slovakia"),
    ("OO-", "Belgium"),
    ("OY-", "Denmark"),
    ("P4-", "Aruba"),
    ("PH-", "Netherlands"),
    ("PK-", "Indonesia"),
    ("PP-", "Brazil"),
    ("PR-", "Brazil"),
    ("PS-", "Brazil"),
    ("PT-", "Brazil"),
    ("PU-", "Brazil"),
    ("RA-", "Russia"),
    ("RP-", "Philippines"),
    ("S2-", "Bangladesh"),
    ("S5-", "Slovenia"),
    ("SE-", "Sweden"),
    ("SP-", "Poland"),
    ("SU-", "Egypt"),
    ("SX-", "Greece"),
    ("T7-", "San Marino"),
    ("TC-", "Turkey"),
    ("TF-", "Iceland"),
    ("TS-", "Tunisia"),
    ("UK-", "Uzbekistan"),
    ("UP-", "Kazakhstan"),
    ("UR-", "Ukraine"),
    ("VH-", "Australia"),
    ("VN-", "Vietnam"),
    ("VP-B", "Bermuda"),
    ("VP-C", "Cayman Islands"),
    ("VQ-B", "Bermuda"),
    ("VT-", "India"),
    ("XA-", "Mexico"),
    ("XB-", "Mexico"),
    ("XC-", "Mexico"),
    ("YI-", "Iraq"),
    ("YL-", "Latvia"),
    ("YR-", "Romania"),
    ("YU-", "Serbia"),
    ("YV-", "Venezuela"),
    ("Z3-", "North Macedonia"),
    ("ZA-", "Albania"),
    ("ZK-", "New Zealand"),
    ("ZS-", "South Africa"),
];

/// Prefix table ordered longest first so the first hit is the longest match.
static PREFIXES_LONGEST_FIRST: once_cell::sync::Lazy<Vec<(&'static str, &'static str)>> =
    once_cell::sync::Lazy::new(|| {
        let mut prefixes = REGISTRATION_PREFIXES.to_vec();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        prefixes
    });

#[must_use]
pub fn country_for_registration(registration: &str) -> String {
    let registration = registration.trim().to_ascii_uppercase();
    let Some(first) = registration.chars().next() else {
        return String::from("Unknown");
    };

    PREFIXES_LONGEST_FIRST
        .iter()
        .find(|(prefix, _)| registration.starts_with(prefix))
        .map_or_else(
            || format!("Unknown ({first})"),
            |(_, country)| (*country).to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::country_for_registration;

    #[test]
    fn when_prefix_is_known_then_country_is_returned() {
        assert_eq!(country_for_registration("OO-SNA"), "Belgium");
        assert_eq!(country_for_registration("d-aimc"), "Germany");
        assert_eq!(country_for_registration("N628TS"), "United States");
    }

    #[test]
    fn when_several_prefixes_match_then_longest_wins() {
        assert_eq!(country_for_registration("B-HNR"), "Hong Kong");
        assert_eq!(country_for_registration("B-18901"), "China");
        assert_eq!(country_for_registration("VP-BDM"), "Bermuda");
    }

    #[test]
    fn when_prefix_is_unknown_then_first_character_is_reported() {
        assert_eq!(country_for_registration("Q-ABC"), "Unknown (Q)");
        assert_eq!(country_for_registration("16-0123"), "Unknown (1)");
    }

    #[test]
    fn when_registration_is_empty_then_unknown() {
        assert_eq!(country_for_registration(""), "Unknown");
        assert_eq!(country_for_registration("   "), "Unknown");
    }
}
