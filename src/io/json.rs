use std::io::{self, Write};
use std::path::Path;

use nalgebra::Vector2;
use serde::Serialize;

use crate::gnc::ModeKind;
use crate::sim::{FlightLog, SimEvent, Snapshot};

/// Summary statistics computed from a flight log.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub duration: f64,      // s
    pub path_length: f64,   // m
    pub max_speed: f64,     // m/s
    pub max_turn_rate: f64, // rad/s
    pub final_position: Vector2<f64>,
    pub final_mode: ModeKind,
    /// Distance to the target still active at the end, if any.
    pub final_distance: Option<f64>,
    pub events: Vec<SimEvent>,
}

impl FlightSummary {
    /// Compute summary from a flight log. Returns `None` for an empty trajectory.
    pub fn from_log(log: &FlightLog) -> Option<Self> {
        let last = log.trajectory.last()?;
        Some(FlightSummary {
            duration: last.time,
            path_length: path_length(&log.trajectory),
            max_speed: log.trajectory.iter().map(Snapshot::speed).fold(0.0_f64, f64::max),
            max_turn_rate: log.trajectory.iter().map(|s| s.omega.abs()).fold(0.0_f64, f64::max),
            final_position: last.pos,
            final_mode: last.mode,
            final_distance: last.distance_to_target(),
            events: log.events.clone(),
        })
    }
}

fn path_length(trajectory: &[Snapshot]) -> f64 {
    trajectory.windows(2).map(|w| (w[1].pos - w[0].pos).norm()).sum()
}

#[derive(Serialize)]
struct Document<'a> {
    scenario: &'a str,
    performance: &'a FlightSummary,
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &str,
    summary: &FlightSummary,
) -> io::Result<()> {
    let doc = Document { scenario, performance: summary };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    scenario: &str,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, scenario, summary)
}
