use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{TrackError, TrackResult};
use crate::geometry::PlotRegistry;
use crate::models::{GpsSample, LastLocation, ResolvedSample, Row, RowStatus, SessionInfo};
use crate::tracking::TrackerConfig;

use super::{TrackerState, TrackerStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub status: TrackerStatus,
    pub session: Option<SessionInfo>,
    pub rows: Vec<RowStatus>,
    pub last_location: Option<LastLocation>,
}

/// Shareable handle to one tracker.
///
/// Cloning is cheap and every clone drives the same state. Each operation
/// takes the state lock exactly once, so concurrent ingestion requests are
/// serialized per sample.
#[derive(Clone)]
pub struct TrackerController {
    state: Arc<Mutex<TrackerState>>,
    plots: Arc<PlotRegistry>,
}

impl TrackerController {
    /// Fails when `config` is out of range (see `TrackerConfig::validate`).
    pub fn new(plots: PlotRegistry, config: TrackerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Arc::new(Mutex::new(TrackerState::new(config))),
            plots: Arc::new(plots),
        })
    }

    pub fn plot_names(&self) -> Vec<String> {
        self.plots.plot_names()
    }

    pub async fn select_plot(&self, name: &str) -> TrackResult<Vec<Row>> {
        let plot = self
            .plots
            .get(name)
            .ok_or_else(|| TrackError::UnknownPlot(name.to_string()))?;

        let mut state = self.state.lock().await;
        state.select_plot(plot)
    }

    /// Start a spraying run and return its id.
    ///
    /// Starting while already active reinitializes the session: a new id and
    /// an empty history, with row state carried over.
    pub async fn start_session(&self) -> TrackResult<String> {
        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        let mut state = self.state.lock().await;
        let restarted = state.status == TrackerStatus::Active;
        state.begin_session(session_id.clone(), started_at)?;

        match state.plot_name() {
            Some(plot) => log_info!(
                "{} session {} on plot '{}'",
                if restarted { "Restarted" } else { "Started" },
                session_id,
                plot
            ),
            None => log_warn!(
                "Started session {} with no plot selected; samples will be ignored",
                session_id
            ),
        }

        Ok(session_id)
    }

    pub async fn stop_session(&self) {
        let mut state = self.state.lock().await;
        if state.stop(Utc::now()) {
            if let Some(info) = state.session_info() {
                log_info!(
                    "Stopped session {}: {}/{} rows sprayed ({:.0}%) from {} samples",
                    info.id,
                    info.rows_sprayed,
                    info.rows_total,
                    info.coverage() * 100.0,
                    info.samples_processed
                );
            }
        }
    }

    /// Entry point for every GPS push.
    ///
    /// `Ok(None)` means the fix was stored as the last known location but
    /// produced no row-state change (no active session, no plot, or a
    /// sample from a previous session).
    pub async fn ingest(
        &self,
        lat: f64,
        lon: f64,
        timestamp: DateTime<Utc>,
        session_id: Option<&str>,
    ) -> TrackResult<Option<ResolvedSample>> {
        let sample = GpsSample {
            timestamp,
            lat,
            lon,
            session_id: session_id.map(str::to_string),
        };

        let result = self.state.lock().await.ingest(&sample);
        if let Err(err) = &result {
            log_warn!("Rejected GPS sample: {}", err);
        }
        result
    }

    pub async fn row_status(&self) -> Vec<RowStatus> {
        self.state.lock().await.row_status()
    }

    pub async fn last_location(&self) -> Option<LastLocation> {
        self.state.lock().await.last_location()
    }

    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.state.lock().await.session_info()
    }

    pub async fn history(&self) -> Vec<ResolvedSample> {
        self.state.lock().await.history().to_vec()
    }

    pub async fn get_snapshot(&self) -> TrackerSnapshot {
        let state = self.state.lock().await;
        TrackerSnapshot {
            status: state.status,
            session: state.session_info(),
            rows: state.row_status(),
            last_location: state.last_location(),
        }
    }
}
