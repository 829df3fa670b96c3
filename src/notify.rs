//! Delivery of newly spotted aircraft to the configured sinks.

use crate::observation::Observation;
use crate::thread_manager::SteppableTask;
use std::io::Write;

#[derive(Debug)]
pub enum NotifyError {
    Io(std::io::Error),
}
impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Io(error) => write!(f, "Failed to write notification: {error}"),
        }
    }
}
impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Io(error) => Some(error),
        }
    }
}
impl From<std::io::Error> for NotifyError {
    fn from(error: std::io::Error) -> Self {
        NotifyError::Io(error)
    }
}

/// A sink for batches of newly spotted aircraft, closest first.
pub trait Notifier: Send {
    fn name(&self) -> &str;
    fn notify(&mut self, aircraft: &[Observation]) -> Result<(), NotifyError>;
}

fn render(observation: &Observation) -> String {
    let mut lines = vec![
        format!(
            "{0} ({1}) {2}",
            observation.callsign, observation.registration, observation.icao
        ),
        format!(
            "  type: {0} {1}",
            observation.type_designator, observation.description
        ),
        format!("  country: {0}", observation.country),
        format!(
            "  distance: {0} km, bearing {1:.0}, altitude {2:.0} ft, speed {3} kn, heading {4:.0}",
            observation.distance_km,
            observation.bearing_from_location,
            observation.altitude_feet,
            observation.speed_knots,
            observation.heading
        ),
        format!(
            "  military: {0}, inbound: {1}, clouds: {2}%",
            observation.military_label(),
            observation.inbound,
            observation.cloud_coverage
        ),
    ];
    if let Some(route) = &observation.route {
        lines.push(format!(
            "  route: {0} {1} -> {2}",
            route.airline, route.origin, route.destination
        ));
    }
    if !observation.image.is_empty() {
        lines.push(format!(
            "  photo: {0} ({1})",
            observation.image.url, observation.image.photographer
        ));
    }
    lines.push(format!("  track: {0}", observation.tracker_url));
    lines.join("\n")
}

/// Writes one block per aircraft.
pub struct TerminalNotifier<W: std::io::Write + Send> {
    out: W,
}

impl TerminalNotifier<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        TerminalNotifier {
            out: std::io::stdout(),
        }
    }
}

impl<W: std::io::Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        TerminalNotifier { out }
    }
}

impl<W: std::io::Write + Send> Notifier for TerminalNotifier<W> {
    fn name(&self) -> &str {
        "terminal"
    }

    fn notify(&mut self, aircraft: &[Observation]) -> Result<(), NotifyError> {
        for observation in aircraft {
            writeln!(self.out, "{}\n", render(observation))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Receives each cycle's batch and hands it to every notifier in turn.
pub struct NotificationDispatcher {
    receiver: crossbeam_channel::Receiver<Vec<Observation>>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(
        receiver: crossbeam_channel::Receiver<Vec<Observation>>,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> Self {
        NotificationDispatcher {
            receiver,
            notifiers,
        }
    }

    fn dispatch(&mut self, batch: &[Observation]) {
        for notifier in &mut self.notifiers {
            match notifier.notify(batch) {
                Ok(()) => log::info!(
                    "Sent {0} aircraft to {1} notifier",
                    batch.len(),
                    notifier.name()
                ),
                Err(e) => log::warn!("{0} notifier failed: {e}", notifier.name()),
            }
        }
    }
}

impl SteppableTask for NotificationDispatcher {
    fn step(&mut self) -> bool {
        match self
            .receiver
            .recv_timeout(std::time::Duration::from_millis(200))
        {
            Ok(batch) => {
                self.dispatch(&batch);
                true
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => true,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                log::error!("Spotter channel disconnected, dispatcher stopping");
                false
            }
        }
    }
}
