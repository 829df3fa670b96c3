use crate::observation::Observation;

pub const ALL_TYPES: &str = "ALL";
pub const MILITARY_TYPE: &str = "MILITARY";

/// One entry of the configured type allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRule {
    /// Wildcard, every aircraft passes.
    All,
    /// Any aircraft flagged military by the feed, whatever its designator.
    Military,
    /// An exact ICAO type designator such as `F16` or `A320`.
    Designator(String),
}

impl TypeRule {
    /// Parses one identifier; whitespace is stripped and case ignored.
    #[must_use]
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier: String = identifier
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match identifier.as_str() {
            "" => None,
            ALL_TYPES => Some(TypeRule::All),
            MILITARY_TYPE => Some(TypeRule::Military),
            _ => Some(TypeRule::Designator(identifier)),
        }
    }

    #[must_use]
    pub fn matches(&self, observation: &Observation) -> bool {
        match self {
            TypeRule::All => true,
            TypeRule::Military => observation.military,
            TypeRule::Designator(designator) => {
                observation.type_designator.eq_ignore_ascii_case(designator)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    rules: Vec<TypeRule>,
}

impl TypeFilter {
    #[must_use]
    pub fn new(rules: Vec<TypeRule>) -> Self {
        TypeFilter { rules }
    }

    #[must_use]
    pub fn from_identifiers<S: AsRef<str>>(identifiers: &[S]) -> Self {
        TypeFilter::new(
            identifiers
                .iter()
                .filter_map(|identifier| TypeRule::parse(identifier.as_ref()))
                .collect(),
        )
    }

    #[must_use]
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    #[must_use]
    pub fn accepts(&self, observation: &Observation) -> bool {
        self.rules.iter().any(|rule| rule.matches(observation))
    }

    /// Keeps the observations matching at least one rule, in input order.
    #[must_use]
    pub fn apply(&self, observations: &[Observation]) -> Vec<Observation> {
        if self.rules.contains(&TypeRule::All) {
            return observations.to_vec();
        }
        observations
            .iter()
            .filter(|observation| self.accepts(observation))
            .cloned()
            .collect()
    }
}

#[must_use]
pub fn filter_by_range(observations: &[Observation], range_km: u32) -> Vec<Observation> {
    observations
        .iter()
        .filter(|observation| observation.distance_km <= i64::from(range_km))
        .cloned()
        .collect()
}

/// Drops aircraft above the ceiling (inclusive); a ceiling of 0 disables it.
#[must_use]
pub fn filter_by_altitude(observations: &[Observation], max_altitude_feet: u32) -> Vec<Observation> {
    if max_altitude_feet == 0 {
        return observations.to_vec();
    }
    observations
        .iter()
        .filter(|observation| observation.altitude_feet <= f64::from(max_altitude_feet))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::fixtures::observation;

    fn planes() -> Vec<Observation> {
        let mut apex11 = observation("a00001", "APEX11");
        apex11.type_designator = String::from("F16");
        apex11.military = true;
        let mut apex12 = observation("a00002", "APEX12");
        apex12.type_designator = String::from("F16");
        apex12.military = true;
        let mut xsg123 = observation("a00003", "XSG123");
        xsg123.type_designator = String::from("B77L");
        let mut abc987 = observation("a00004", "ABC987");
        abc987.type_designator = String::from("A320");
        let mut grzly11 = observation("a00005", "GRZLY11");
        grzly11.type_designator = String::from("A400");
        grzly11.military = true;
        vec![apex11, apex12, xsg123, abc987, grzly11]
    }

    fn callsigns(observations: &[Observation]) -> Vec<&str> {
        observations.iter().map(|o| o.callsign.as_str()).collect()
    }

    mod when_filtering_by_type {
        use super::*;

        #[test]
        fn and_list_contains_all_then_every_observation_passes_unchanged() {
            let planes = planes();
            assert_eq!(TypeFilter::from_identifiers(&["ALL"]).apply(&planes), planes);
        }

        #[test]
        fn and_list_is_single_designator_then_only_that_type_passes() {
            let filtered = TypeFilter::from_identifiers(&["F16"]).apply(&planes());
            assert_eq!(callsigns(&filtered), vec!["APEX11", "APEX12"]);
        }

        #[test]
        fn and_list_is_military_then_only_flagged_aircraft_pass() {
            let filtered = TypeFilter::from_identifiers(&["MILITARY"]).apply(&planes());
            assert_eq!(callsigns(&filtered), vec!["APEX11", "APEX12", "GRZLY11"]);
        }

        #[test]
        fn and_list_mixes_military_and_designator_then_union_without_duplicates() {
            let filtered = TypeFilter::from_identifiers(&["MILITARY", "A320", "F16"]).apply(&planes());
            assert_eq!(
                callsigns(&filtered),
                vec!["APEX11", "APEX12", "ABC987", "GRZLY11"]
            );
        }

        #[test]
        fn and_list_has_several_designators_then_union_match() {
            let filtered = TypeFilter::from_identifiers(&["F16", "A400"]).apply(&planes());
            assert_eq!(callsigns(&filtered), vec!["APEX11", "APEX12", "GRZLY11"]);
        }

        #[test]
        fn and_military_aircraft_has_no_designator_then_military_rule_still_matches() {
            let mut unknown = observation("a00009", "RCH123");
            unknown.military = true;
            let filtered = TypeFilter::from_identifiers(&["MILITARY"]).apply(&[unknown]);
            assert_eq!(filtered.len(), 1);
        }
    }

    #[test]
    fn when_parsing_identifiers_then_case_and_whitespace_are_ignored() {
        let filter = TypeFilter::from_identifiers(&[" all", "mili tary", "f16", ""]);
        assert_eq!(
            filter.rules(),
            &[
                TypeRule::All,
                TypeRule::Military,
                TypeRule::Designator(String::from("F16"))
            ]
        );
    }

    mod when_filtering_by_altitude {
        use super::*;

        fn at_altitudes(altitudes: &[f64]) -> Vec<Observation> {
            altitudes
                .iter()
                .enumerate()
                .map(|(index, altitude)| {
                    let mut o = observation(&format!("b0000{index}"), &format!("KHARMA1{index}"));
                    o.altitude_feet = *altitude;
                    o
                })
                .collect()
        }

        #[test]
        fn and_ceiling_is_zero_then_all_pass() {
            let observations = at_altitudes(&[0.0, 4000.0, 45_000.0]);
            assert_eq!(filter_by_altitude(&observations, 0), observations);
        }

        #[test]
        fn and_altitude_equals_ceiling_then_it_passes() {
            let filtered = filter_by_altitude(&at_altitudes(&[5000.0]), 5000);
            assert_eq!(filtered.len(), 1);
        }

        #[test]
        fn and_altitude_is_one_above_ceiling_then_it_is_excluded() {
            assert!(filter_by_altitude(&at_altitudes(&[5001.0]), 5000).is_empty());
        }

        #[test]
        fn and_some_are_on_ground_then_ground_and_low_aircraft_pass() {
            let filtered = filter_by_altitude(&at_altitudes(&[0.0, 3000.0, 8000.0]), 5000);
            assert_eq!(callsigns(&filtered), vec!["KHARMA10", "KHARMA11"]);
        }
    }

    #[test]
    fn when_filtering_by_range_then_boundary_is_inclusive_and_input_untouched() {
        let mut near = observation("c00001", "NEAR1");
        near.distance_km = 20;
        let mut far = observation("c00002", "FAR1");
        far.distance_km = 21;
        let observations = vec![near, far];

        let filtered = filter_by_range(&observations, 20);

        assert_eq!(callsigns(&filtered), vec!["NEAR1"]);
        assert_eq!(observations.len(), 2);
    }
}
