//! In-process counters for spotted aircraft, ready for an exporter to scrape.

use crate::observation::Observation;

pub const ALTITUDE_BUCKETS_FEET: [f64; 10] = [
    0.0, 2500.0, 5000.0, 10000.0, 15000.0, 20000.0, 25000.0, 30000.0, 35000.0, 40000.0,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotLabels {
    pub aircraft_type: String,
    pub description: String,
    pub military: String,
}

impl SpotLabels {
    #[must_use]
    pub fn of(observation: &Observation) -> Self {
        SpotLabels {
            aircraft_type: observation.type_designator.clone(),
            description: observation.description.clone(),
            military: observation.military_label().to_string(),
        }
    }
}

/// Cumulative histogram: `bucket_counts[i]` counts observations `<= ALTITUDE_BUCKETS_FEET[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AltitudeHistogram {
    pub bucket_counts: [u64; ALTITUDE_BUCKETS_FEET.len()],
    pub count: u64,
    pub sum: f64,
}

impl AltitudeHistogram {
    fn observe(&mut self, altitude_feet: f64) {
        for (bucket, upper_bound) in self.bucket_counts.iter_mut().zip(ALTITUDE_BUCKETS_FEET) {
            if altitude_feet <= upper_bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum += altitude_feet;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsSnapshot {
    pub spotted_total: std::collections::BTreeMap<SpotLabels, u64>,
    pub altitude_feet: std::collections::BTreeMap<SpotLabels, AltitudeHistogram>,
}

impl MetricsSnapshot {
    /// Sum of the spotted counter over every label set.
    #[must_use]
    pub fn total_spotted(&self) -> u64 {
        self.spotted_total.values().sum()
    }
}

#[derive(Debug, Default)]
pub struct SpotMetrics {
    inner: std::sync::Mutex<MetricsSnapshot>,
}

impl SpotMetrics {
    #[must_use]
    pub fn new() -> Self {
        SpotMetrics::default()
    }

    /// Counts one newly spotted aircraft and records its altitude.
    pub fn record_spotted(&self, observation: &Observation) {
        let labels = SpotLabels::of(observation);
        let mut metrics = match self.inner.lock() {
            Ok(metrics) => metrics,
            Err(poisoned) => poisoned.into_inner(),
        };
        *metrics.spotted_total.entry(labels.clone()).or_insert(0) += 1;
        metrics
            .altitude_feet
            .entry(labels)
            .or_default()
            .observe(observation.altitude_feet);
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        match self.inner.lock() {
            Ok(metrics) => metrics.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
