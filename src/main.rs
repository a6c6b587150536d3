use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use vinetrack_lib::{
    init_logging, ResolvedSample, RowStatus, SessionInfo, Settings, TrackerController,
};

/// Replay a recorded GPS track against a plot and report row coverage
#[derive(Parser, Debug)]
#[command(name = "vinetrack", about = "Vineyard row spray tracker (track replay)")]
struct Cli {
    /// Plot to track against
    #[arg(long, default_value = "My Vineyard")]
    plot: String,

    /// GPS track: a JSON array or JSON lines of {lat, lon, timestamp}
    #[arg(long, required_unless_present = "list_plots")]
    track: Option<PathBuf>,

    /// Settings file with tracker tuning and extra plots
    #[arg(long, env = "VINETRACK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Include every resolved sample in the report
    #[arg(long, default_value = "false")]
    history: bool,

    /// List registered plots and exit
    #[arg(long, default_value = "false")]
    list_plots: bool,
}

#[derive(Debug, Deserialize)]
struct TrackPoint {
    lat: f64,
    lon: f64,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    session: Option<SessionInfo>,
    rejected_samples: usize,
    rows: Vec<RowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<ResolvedSample>>,
}

fn read_track(path: &Path) -> Result<Vec<TrackPoint>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read track from {}", path.display()))?;

    if contents.trim_start().starts_with('[') {
        return serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse track array in {}", path.display()));
    }

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} of {}", n + 1, path.display()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let controller = TrackerController::new(settings.plot_registry()?, settings.tracker.clone())?;

    if cli.list_plots {
        for name in controller.plot_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let track_path = cli.track.as_deref().context("--track is required")?;
    let track = read_track(track_path)?;
    info!("Replaying {} samples on plot '{}'", track.len(), cli.plot);

    controller.select_plot(&cli.plot).await?;
    let session_id = controller.start_session().await?;

    let mut rejected_samples = 0;
    for point in track {
        let timestamp = point.timestamp.unwrap_or_else(Utc::now);
        if let Err(err) = controller
            .ingest(point.lat, point.lon, timestamp, Some(&session_id))
            .await
        {
            warn!("Skipping sample: {err}");
            rejected_samples += 1;
        }
    }

    controller.stop_session().await;

    let report = ReplayReport {
        session: controller.session_info().await,
        rejected_samples,
        rows: controller.row_status().await,
        history: if cli.history {
            Some(controller.history().await)
        } else {
            None
        },
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
