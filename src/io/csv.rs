use std::io::{self, Write};
use std::path::Path;

use crate::sim::Snapshot;

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, heading_deg, vel_x, vel_y, speed, omega,
///          mode, target_x, target_y, ang_acc, lin_acc
///
/// Target columns are empty while idle.
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Snapshot]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,heading_deg,vel_x,vel_y,speed,omega,\
         mode,target_x,target_y,ang_acc,lin_acc"
    )?;

    for s in trajectory {
        let (tx, ty) = match s.target {
            Some(t) => (format!("{:.4}", t.x), format!("{:.4}", t.y)),
            None => (String::new(), String::new()),
        };
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.2},{:.4},{:.4},{:.4},{:.6},\
             {},{},{},{:.4},{:.4}",
            s.time,
            s.pos.x, s.pos.y,
            s.angle.to_degrees(),
            s.vel.x, s.vel.y,
            s.speed(),
            s.omega,
            s.mode,
            tx, ty,
            s.angular_acceleration,
            s.linear_acceleration,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[Snapshot]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
