pub mod actuation;
pub mod controller;
pub mod guidance;
pub mod pid;
pub mod waypoints;

pub use actuation::{apply_thrust, apply_turn_torque, bearing_error, clamp_symmetric, is_reached};
pub use controller::FeedbackController;
pub use guidance::{Actuation, GuidanceController, Mode, ModeKind};
pub use pid::Pid;
pub use waypoints::WaypointQueue;
