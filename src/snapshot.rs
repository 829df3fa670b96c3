use crate::observation::Observation;

/// Every aircraft currently inside the scan range, as of the last poll.
#[derive(Debug, Default)]
pub struct ScanSnapshot {
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
    aircraft: Vec<Observation>,
}

impl ScanSnapshot {
    #[must_use]
    pub fn aircraft(&self) -> &[Observation] {
        &self.aircraft
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.updated_at
    }
}

/// Write side, owned by the orchestrator.
pub struct SnapshotStore {
    inner: std::sync::Arc<std::sync::RwLock<ScanSnapshot>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        SnapshotStore {
            inner: std::sync::Arc::new(std::sync::RwLock::new(ScanSnapshot::default())),
        }
    }

    #[must_use]
    pub fn viewer(&self) -> SnapshotViewer {
        SnapshotViewer {
            inner: self.inner.clone(),
        }
    }

    /// Replaces the whole snapshot; the lock is held only for the swap.
    pub fn replace(&self, aircraft: Vec<Observation>) {
        let mut next = ScanSnapshot {
            updated_at: Some(chrono::Utc::now()),
            aircraft,
        };
        match self.inner.write() {
            Ok(mut snapshot) => std::mem::swap(&mut *snapshot, &mut next),
            Err(poisoned) => {
                log::error!("Snapshot lock poisoned, recovering");
                std::mem::swap(&mut *poisoned.into_inner(), &mut next);
            }
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        SnapshotStore::new()
    }
}

/// Read side handed to API and metrics consumers on other threads.
#[derive(Clone)]
pub struct SnapshotViewer {
    inner: std::sync::Arc<std::sync::RwLock<ScanSnapshot>>,
}

impl SnapshotViewer {
    /// Copy of the current aircraft list.
    #[must_use]
    pub fn aircraft(&self) -> Vec<Observation> {
        match self.inner.read() {
            Ok(snapshot) => snapshot.aircraft.clone(),
            Err(poisoned) => poisoned.into_inner().aircraft.clone(),
        }
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        match self.inner.read() {
            Ok(snapshot) => snapshot.updated_at,
            Err(poisoned) => poisoned.into_inner().updated_at,
        }
    }
}
