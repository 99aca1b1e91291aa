use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use missile_guidance::io::{write_summary_file, write_trajectory_file, FlightSummary};
use missile_guidance::sim::scenario::presets;
use missile_guidance::sim::{EventKind, Scenario};
use missile_guidance::RigidBody;

/// Fly a guidance scenario and print the flight report.
#[derive(Parser, Debug)]
#[command(name = "missile-guidance", version)]
struct Args {
    /// Scenario JSON file, or `patrol` for the built-in square patrol.
    /// Runs the downrange seek demo when omitted.
    scenario: Option<String>,

    /// Write the sampled trajectory as CSV
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

/// `RUST_LOG` directives when set and valid, warnings only otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> ExitCode {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = match args.scenario.as_deref() {
        None => presets::seek_downrange(),
        Some("patrol") => presets::patrol_square(),
        Some(path) => match Scenario::load(path) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("{path}: {err}");
                return ExitCode::FAILURE;
            }
        },
    };

    let (body, log) = match scenario.run() {
        Ok(r) => r,
        Err(err) => {
            eprintln!("{}: {err}", scenario.name);
            return ExitCode::FAILURE;
        }
    };
    let Some(summary) = FlightSummary::from_log(&log) else {
        eprintln!("{}: empty trajectory", scenario.name);
        return ExitCode::FAILURE;
    };

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let g = &scenario.guidance;
    println!();
    println!("====================================================================");
    println!("  MISSILE GUIDANCE — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Airframe & Limits");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.2} kg    Inertia:      {:>8.2} kg·m^2",
        body.mass(),
        body.inertia()
    );
    println!(
        "  Max lin acc:   {:>8.1} m/s^2 Max ang acc:  {:>8.2} rad/s^2",
        g.max_linear_acceleration, g.max_angular_acceleration
    );
    println!(
        "  Seek radius:   {:>8.1} m     Step:         {:>8.4} s",
        g.min_seek_distance, scenario.sim.dt
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if log.events.is_empty() {
        println!("  (none)");
    }
    for e in &log.events {
        let what = match &e.kind {
            EventKind::ModeChange { from, to } => format!("MODE      {from} -> {to}"),
            EventKind::WaypointReached { index } => format!("WAYPOINT  #{index} reached"),
            EventKind::Arrived => "ARRIVED   holding on target".to_string(),
            EventKind::Custom { message } => message.clone(),
        };
        println!("  t={:>7.2}s   {}", e.time, what);
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Flight time:   {:>8.2} s", summary.duration);
    println!("  Path length:   {:>8.1} m", summary.path_length);
    println!("  Max speed:     {:>8.2} m/s", summary.max_speed);
    println!("  Max turn rate: {:>8.3} rad/s", summary.max_turn_rate);
    println!(
        "  Final pos:     ({:.2}, {:.2})   mode {}",
        summary.final_position.x, summary.final_position.y, summary.final_mode
    );
    if let Some(d) = summary.final_distance {
        println!("  To target:     {:>8.2} m", d);
    }
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>5}",
        "t (s)", "x (m)", "y (m)", "hdg(deg)", "v (m/s)", "mode"
    );
    println!("  {}", "─".repeat(56));
    let sample_interval = (log.trajectory.len() / 30).max(1);
    for (i, s) in log.trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != log.trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.2}  {:>8.1}  {:>8.2}  {:>5}",
            s.time,
            s.pos.x,
            s.pos.y,
            s.angle.to_degrees(),
            s.speed(),
            s.mode
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={:.4} s", log.trajectory.len(), scenario.sim.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        if let Err(err) = write_trajectory_file(path, &log.trajectory) {
            eprintln!("{}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }
    if let Some(path) = &args.json {
        if let Err(err) = write_summary_file(path, &scenario.name, &summary) {
            eprintln!("{}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn parses_scenario_and_outputs() {
        let argv = ["missile-guidance", "patrol", "--csv", "t.csv", "--json", "s.json"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.scenario.as_deref(), Some("patrol"));
        assert_eq!(args.csv, Some(PathBuf::from("t.csv")));
        assert_eq!(args.json, Some(PathBuf::from("s.json")));

        let args = Args::try_parse_from(["missile-guidance"]).unwrap();
        assert!(args.scenario.is_none() && args.csv.is_none() && args.json.is_none());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Args::try_parse_from(["missile-guidance", "--csv"]).is_err());
        assert!(Args::try_parse_from(["missile-guidance", "a.json", "b.json"]).is_err());
        assert!(Args::try_parse_from(["missile-guidance", "--bogus"]).is_err());
    }

    #[test]
    fn logging_is_quiet_unless_asked() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("missile_guidance=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
