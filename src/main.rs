use clap::Parser;
use log::info;
use skywatch::cli::Cli;
use skywatch::config::ApplicationConfig;
use skywatch::enrichment::imagery::ImageClient;
use skywatch::enrichment::route::RouteClient;
use skywatch::enrichment::weather::WeatherClient;
use skywatch::enrichment::Enricher;
use skywatch::feed::AdsbFeed;
use skywatch::filter::TypeFilter;
use skywatch::http::{HttpClient, ReqwestClient};
use skywatch::logging::setup_logging;
use skywatch::metrics::SpotMetrics;
use skywatch::normalizer::Reference;
use skywatch::notify::{NotificationDispatcher, Notifier, TerminalNotifier};
use skywatch::observation::Observation;
use skywatch::snapshot::SnapshotStore;
use skywatch::spotter::{Spotter, SpotterSettings};
use skywatch::thread_manager::ThreadManager;

fn exit_with(message: &str) -> ! {
    log::error!("{message}");
    std::process::exit(1)
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);

    let application_config = ApplicationConfig::construct_from_path(&cli.config_file)
        .unwrap_or_else(|e| exit_with(&format!("{e}. Exiting.")));
    info!("Main: Application started.");

    let http: std::sync::Arc<dyn HttpClient> = match ReqwestClient::new(
        application_config.http.timeout(),
        &application_config.http.user_agent,
    ) {
        Ok(client) => std::sync::Arc::new(client),
        Err(e) => exit_with(&format!("Error constructing HTTP client: {e}")),
    };

    let location = application_config.location;
    let spotter_config = &application_config.spotter;
    let aircraft_types = spotter_config.aircraft_types();
    let settings = SpotterSettings {
        reference: Reference {
            location,
            inbound_margin_degrees: spotter_config.inbound_margin_degrees,
        },
        notification_range_km: spotter_config.notification_range_km,
        scan_range_km: spotter_config.scan_range_km(),
        type_filter: TypeFilter::from_identifiers(aircraft_types.as_slice()),
        max_altitude_feet: spotter_config.max_altitude_feet,
    };
    info!(
        "Main: Watching {0}, {1} within {2} km (scan {3} km), every {4:?}",
        location,
        aircraft_types.join(","),
        settings.notification_range_km,
        settings.scan_range_km,
        spotter_config.fetch_interval()
    );

    let (spotted_sender, spotted_receiver): (
        crossbeam_channel::Sender<Vec<Observation>>,
        crossbeam_channel::Receiver<Vec<Observation>>,
    ) = crossbeam_channel::unbounded();

    let http_config = &application_config.http;
    let enricher = Enricher::new(
        location,
        WeatherClient::new(http.clone(), &http_config.weather_url),
        ImageClient::new(http.clone(), &http_config.photos_url),
        RouteClient::new(http.clone(), &http_config.route_url),
    );
    // Read handles for an exporter or read API running alongside the spotter.
    let snapshot = SnapshotStore::new();
    let snapshot_viewer = snapshot.viewer();
    let metrics = std::sync::Arc::new(SpotMetrics::new());

    let spotter = Spotter::new(
        settings,
        AdsbFeed::new(http, &http_config.feed_url),
        enricher,
        snapshot,
        metrics.clone(),
        spotted_sender,
    );

    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if spotter_config.log_new_planes_to_console {
        notifiers.push(Box::new(TerminalNotifier::stdout()));
    }
    let dispatcher = NotificationDispatcher::new(spotted_receiver, notifiers);

    let mut thread_manager = ThreadManager::new();
    let spotter_task_id = thread_manager
        .add_task(spotter, spotter_config.fetch_interval())
        .unwrap_or_else(|e| exit_with(&format!("Failed to start spotter: {e}")));
    let dispatcher_task_id = thread_manager
        .add_task(dispatcher, std::time::Duration::ZERO)
        .unwrap_or_else(|e| exit_with(&format!("Failed to start dispatcher: {e}")));

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
        thread_manager.stop_all_tasks();
    }

    thread_manager.wait_on_task_finish(spotter_task_id);
    thread_manager.wait_on_task_finish(dispatcher_task_id);

    info!(
        "Main: Program finished. {0} aircraft in last scan (at {1:?}), {2} spotted in total.",
        snapshot_viewer.aircraft().len(),
        snapshot_viewer.updated_at(),
        metrics.snapshot().total_spotted()
    );
}
