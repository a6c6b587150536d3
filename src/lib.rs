//! Row-level spray coverage tracking.
//!
//! GPS fixes from a handheld device are snapped onto known vine-row
//! centerlines; a row counts as sprayed once enough recent fixes land on it.
//! The ingestion transport and map rendering live outside this crate and
//! talk to it through [`TrackerController`].

pub mod error;
pub mod geometry;
pub mod models;
pub mod session;
pub mod settings;
pub mod tracking;
mod utils;

pub use error::{TrackError, TrackResult};
pub use geometry::{PlotDefinition, PlotRegistry};
pub use models::{
    GeoPoint, GpsSample, LastLocation, ResolvedSample, Row, RowStatus, SessionInfo, SessionStatus,
};
pub use session::{TrackerController, TrackerSnapshot, TrackerState, TrackerStatus};
pub use settings::Settings;
pub use tracking::TrackerConfig;

/// Initialize logging (reads RUST_LOG env var, defaults to info).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
