use clap::Parser;

/// Polls an ADS-B feed around a fixed point and reports newly spotted aircraft.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Stop after this many seconds instead of running until killed.
    #[arg(long)]
    pub duration: Option<u64>,

    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    #[arg(long)]
    pub config_file: std::path::PathBuf,
}
