use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};
use crate::geometry::PlotDefinition;
use crate::models::{
    GeoPoint, GpsSample, LastLocation, ResolvedSample, Row, RowStatus, SessionInfo, SessionStatus,
};
use crate::tracking::{resolve, EvidenceWindow, TrackerConfig};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackerStatus {
    Idle,
    Active,
}

impl Default for TrackerStatus {
    fn default() -> Self {
        TrackerStatus::Idle
    }
}

/// Why a valid sample was accepted as a location fix but not resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    NoSession,
    NoPlot,
    StaleSession,
}

/// Session-scoped tracker state.
///
/// All mutation happens through `&mut self`; the controller wraps this in
/// a single lock so snapping, window counting and row updates for one
/// sample are never interleaved with another.
#[derive(Debug, Clone)]
pub struct TrackerState {
    pub status: TrackerStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    config: TrackerConfig,
    plot: Option<PlotDefinition>,
    rows: Vec<Row>,
    window: EvidenceWindow,
    log: Vec<ResolvedSample>,
    last_location: Option<LastLocation>,
    samples_processed: u64,
    samples_snapped: u64,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl TrackerState {
    pub fn new(config: TrackerConfig) -> Self {
        let window = EvidenceWindow::new(config.window_size, config.min_hits);
        Self {
            status: TrackerStatus::Idle,
            session_id: None,
            started_at: None,
            stopped_at: None,
            config,
            plot: None,
            rows: Vec::new(),
            window,
            log: Vec::new(),
            last_location: None,
            samples_processed: 0,
            samples_snapped: 0,
        }
    }

    pub fn plot_name(&self) -> Option<&str> {
        self.plot.as_ref().map(|p| p.name.as_str())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Select a plot and replace the row set with fresh, unsprayed rows.
    ///
    /// Refused while a session is active; callers stop, select, then start.
    pub fn select_plot(&mut self, plot: &PlotDefinition) -> TrackResult<Vec<Row>> {
        if self.status == TrackerStatus::Active {
            return Err(TrackError::SessionActive);
        }
        let rows = plot.build_rows()?;
        self.plot = Some(plot.clone());
        self.rows = rows.clone();
        log_info!("Selected plot '{}' with {} rows", plot.name, rows.len());
        Ok(rows)
    }

    /// Start (or restart) a session.
    ///
    /// From Idle the selected plot's rows are rebuilt fresh. Restarting an
    /// active session keeps row state and only resets the history.
    pub fn begin_session(&mut self, session_id: String, start_at: DateTime<Utc>) -> TrackResult<()> {
        if self.status == TrackerStatus::Idle {
            if let Some(plot) = &self.plot {
                self.rows = plot.build_rows()?;
            }
        }

        self.status = TrackerStatus::Active;
        self.session_id = Some(session_id);
        self.started_at = Some(start_at);
        self.stopped_at = None;
        self.window.clear();
        self.log.clear();
        self.samples_processed = 0;
        self.samples_snapped = 0;
        Ok(())
    }

    /// Returns false when there was nothing to stop.
    pub fn stop(&mut self, stop_at: DateTime<Utc>) -> bool {
        if self.status == TrackerStatus::Idle {
            return false;
        }
        self.status = TrackerStatus::Idle;
        self.stopped_at = Some(stop_at);
        true
    }

    /// Accept one GPS sample.
    ///
    /// Invalid coordinates are rejected before anything is touched. A valid
    /// sample always becomes the last known location; it is only snapped
    /// and counted as evidence while a session is active on a selected
    /// plot. `Ok(None)` means the sample was accepted but not processed.
    pub fn ingest(&mut self, sample: &GpsSample) -> TrackResult<Option<ResolvedSample>> {
        if !sample.has_valid_coordinates() {
            return Err(TrackError::InvalidCoordinate {
                lat: sample.lat,
                lon: sample.lon,
            });
        }

        self.last_location = Some(LastLocation::from(sample));

        if let Some(reason) = self.skip_reason(sample) {
            log_debug!(
                "Ignoring sample ({}, {}) at {}: {:?}",
                sample.lat,
                sample.lon,
                sample.timestamp,
                reason
            );
            return Ok(None);
        }

        let point = GeoPoint::new(sample.lon, sample.lat);
        let Some(hit) = resolve(point, &self.rows, self.config.meters_per_degree) else {
            log_debug!("Selected plot has no rows; sample at {} not resolved", sample.timestamp);
            return Ok(None);
        };

        self.samples_processed += 1;

        let distance_meters = hit.distance_meters;
        let snapped_row_index =
            (distance_meters <= self.config.snap_threshold_m).then_some(hit.row_index);

        if snapped_row_index.is_some() {
            self.samples_snapped += 1;
        }

        let marked_sprayed = self
            .window
            .accumulate(snapped_row_index, sample.timestamp, &mut self.rows);

        if let (true, Some(row)) = (marked_sprayed, snapped_row_index) {
            log_info!(
                "Row {} marked sprayed at {} (session {})",
                row,
                sample.timestamp,
                self.session_id.as_deref().unwrap_or("-")
            );
        }

        let resolved = ResolvedSample {
            timestamp: sample.timestamp,
            lat: sample.lat,
            lon: sample.lon,
            snapped_row_index,
            distance_meters,
            marked_sprayed,
        };
        self.log.push(resolved.clone());
        Ok(Some(resolved))
    }

    fn skip_reason(&self, sample: &GpsSample) -> Option<SkipReason> {
        if self.status != TrackerStatus::Active {
            return Some(SkipReason::NoSession);
        }
        if self.plot.is_none() {
            return Some(SkipReason::NoPlot);
        }
        match (&sample.session_id, &self.session_id) {
            (Some(sent), Some(active)) if sent != active => Some(SkipReason::StaleSession),
            _ => None,
        }
    }

    pub fn row_status(&self) -> Vec<RowStatus> {
        self.rows.iter().map(Row::status).collect()
    }

    pub fn last_location(&self) -> Option<LastLocation> {
        self.last_location
    }

    pub fn history(&self) -> &[ResolvedSample] {
        &self.log
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        let id = self.session_id.clone()?;
        let started_at = self.started_at?;
        let status = match self.status {
            TrackerStatus::Active => SessionStatus::Active,
            TrackerStatus::Idle => SessionStatus::Stopped,
        };
        Some(SessionInfo {
            id,
            plot_name: self.plot_name().map(str::to_string),
            status,
            started_at,
            stopped_at: self.stopped_at,
            samples_processed: self.samples_processed,
            samples_snapped: self.samples_snapped,
            rows_sprayed: self.rows.iter().filter(|r| r.sprayed).count(),
            rows_total: self.rows.len(),
        })
    }
}
