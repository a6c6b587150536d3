//! Error types for the row-tracking engine.

use thiserror::Error;

/// Errors surfaced by plot selection and GPS ingestion.
///
/// Every variant is local to the call that produced it: the tracker state
/// is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackError {
    /// A row definition cannot be turned into a centerline.
    #[error("invalid geometry for plot '{plot}': {reason}")]
    InvalidGeometry { plot: String, reason: String },

    /// No plot is registered under this name.
    #[error("unknown plot: {0}")]
    UnknownPlot(String),

    /// GPS sample outside the valid latitude/longitude range.
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Plot reselection was attempted while a session is running.
    #[error("a session is active; stop it before selecting another plot")]
    SessionActive,
}

pub type TrackResult<T> = Result<T, TrackError>;
