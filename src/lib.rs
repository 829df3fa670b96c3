pub mod cli;
pub mod config;
pub mod enrichment;
pub mod feed;
pub mod filter;
pub mod geometry;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod notify;
pub mod observation;
pub mod snapshot;
pub mod spotted;
pub mod spotter;
pub mod thread_manager;
pub mod types;
