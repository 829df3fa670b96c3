//! The polling cycle: fetch, normalize, publish, dedupe, filter, enrich, notify.

use crate::enrichment::Enricher;
use crate::feed::{AdsbFeed, FeedError};
use crate::filter::{filter_by_altitude, filter_by_range, TypeFilter};
use crate::metrics::SpotMetrics;
use crate::normalizer::{normalize_all, Reference};
use crate::observation::{sort_by_distance, Observation};
use crate::snapshot::SnapshotStore;
use crate::spotted::SpottedSet;
use crate::thread_manager::SteppableTask;
use chrono::Timelike;

#[derive(Debug, Clone)]
pub struct SpotterSettings {
    pub reference: Reference,
    pub notification_range_km: u32,
    pub scan_range_km: u32,
    pub type_filter: TypeFilter,
    pub max_altitude_feet: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub scanned: usize,
    pub in_notification_range: usize,
    pub newly_spotted: usize,
    pub notified: usize,
}

#[derive(Debug)]
pub enum CycleError {
    Feed(FeedError),
    DispatcherGone,
}
impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleError::Feed(error) => write!(f, "{error}"),
            CycleError::DispatcherGone => write!(f, "Notification dispatcher disconnected"),
        }
    }
}
impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CycleError::Feed(error) => Some(error),
            CycleError::DispatcherGone => None,
        }
    }
}
impl From<FeedError> for CycleError {
    fn from(error: FeedError) -> Self {
        CycleError::Feed(error)
    }
}

pub struct Spotter {
    settings: SpotterSettings,
    feed: AdsbFeed,
    enricher: Enricher,
    spotted: SpottedSet,
    snapshot: SnapshotStore,
    metrics: std::sync::Arc<SpotMetrics>,
    sender: crossbeam_channel::Sender<Vec<Observation>>,
}

impl Spotter {
    #[must_use]
    pub fn new(
        settings: SpotterSettings,
        feed: AdsbFeed,
        enricher: Enricher,
        snapshot: SnapshotStore,
        metrics: std::sync::Arc<SpotMetrics>,
        sender: crossbeam_channel::Sender<Vec<Observation>>,
    ) -> Self {
        Spotter {
            settings,
            feed,
            enricher,
            spotted: SpottedSet::new(),
            snapshot,
            metrics,
            sender,
        }
    }

    /// Runs one full cycle.
    ///
    /// # Errors
    ///
    /// A feed failure aborts the cycle before any state changes; the spotted
    /// set and the snapshot keep their previous contents.
    pub fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let location = self.settings.reference.location;
        let raw = self.feed.fetch(location, self.settings.scan_range_km)?;

        // The feed radius is rounded up to whole nautical miles; trim back to km.
        let mut scanned = filter_by_range(
            &normalize_all(&raw, &self.settings.reference),
            self.settings.scan_range_km,
        );
        Enricher::enrich_light(&mut scanned);
        let in_notification_range = filter_by_range(&scanned, self.settings.notification_range_km);

        let mut report = CycleReport {
            scanned: scanned.len(),
            in_notification_range: in_notification_range.len(),
            ..CycleReport::default()
        };
        self.snapshot.replace(scanned);

        let newly_spotted = self.spotted.update(&in_notification_range);
        report.newly_spotted = newly_spotted.len();
        for observation in &newly_spotted {
            self.metrics.record_spotted(observation);
        }

        let eligible = filter_by_altitude(
            &self.settings.type_filter.apply(&newly_spotted),
            self.settings.max_altitude_feet,
        );
        let hour_utc = chrono::Utc::now().hour() as usize;
        let mut enriched = self.enricher.enrich(eligible, hour_utc);
        sort_by_distance(&mut enriched);
        report.notified = enriched.len();

        if !enriched.is_empty() {
            self.sender
                .send(enriched)
                .map_err(|_| CycleError::DispatcherGone)?;
        }
        Ok(report)
    }
}

impl SteppableTask for Spotter {
    fn step(&mut self) -> bool {
        let started = std::time::Instant::now();
        match self.run_cycle() {
            Ok(report) => {
                log::info!(
                    "Scanned {0} aircraft, {1} in notification range, {2} newly spotted, {3} notified",
                    report.scanned,
                    report.in_notification_range,
                    report.newly_spotted,
                    report.notified
                );
                log::debug!("Cycle took {0:?}", started.elapsed());
                true
            }
            Err(CycleError::Feed(error)) => {
                log::error!("Cycle aborted: {error}");
                true
            }
            Err(error @ CycleError::DispatcherGone) => {
                log::error!("{error}, spotter stopping");
                false
            }
        }
    }
}
