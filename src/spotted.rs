use crate::observation::Observation;
use crate::types::IcaoAddress;

/// Aircraft already reported, keyed by transponder identity.
///
/// Membership always equals the identities of the most recent
/// notification-range batch: anything missing from a batch is forgotten
/// immediately, so an aircraft that leaves and comes back is reported again.
#[derive(Debug, Default)]
pub struct SpottedSet {
    members: std::collections::HashSet<IcaoAddress>,
}

impl SpottedSet {
    #[must_use]
    pub fn new() -> Self {
        SpottedSet::default()
    }

    /// Feeds one poll's notification-range batch through the set and returns
    /// the observations seen for the first time, in batch order.
    pub fn update(&mut self, in_notification_range: &[Observation]) -> Vec<Observation> {
        let mut current = std::collections::HashSet::with_capacity(in_notification_range.len());
        let mut newly_spotted = Vec::new();

        for observation in in_notification_range {
            let first_in_batch = current.insert(observation.icao.clone());
            if first_in_batch && !self.members.contains(&observation.icao) {
                newly_spotted.push(observation.clone());
            }
        }

        let evicted = self.members.difference(&current).count();
        if evicted > 0 {
            log::debug!("Evicted {evicted} aircraft no longer in notification range");
        }
        self.members = current;
        newly_spotted
    }

    #[must_use]
    pub fn contains(&self, icao: &IcaoAddress) -> bool {
        self.members.contains(icao)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
