use std::io::Write;

/// Overrides the CLI level per module, using `RUST_LOG` syntax.
pub const LOG_ENV_VAR: &str = "SKYWATCH_LOG";

fn format_line(
    buf: &mut env_logger::fmt::Formatter,
    record: &log::Record<'_>,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "[{0} {1} {2}] {3}",
        record.level(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.module_path().unwrap_or(""),
        record.args()
    )
}

pub fn setup_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        // HTTP stack internals are only interesting when chasing transport bugs.
        .filter_module("reqwest", level.min(log::LevelFilter::Info))
        .filter_module("rustls", level.min(log::LevelFilter::Warn))
        .format(format_line)
        .target(env_logger::Target::Stdout);
    if let Ok(filters) = std::env::var(LOG_ENV_VAR) {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        log::warn!("Logger already initialised, keeping the existing one");
    }
}
