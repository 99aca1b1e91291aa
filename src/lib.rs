pub mod config;
pub mod dynamics;
pub mod error;
mod gnc_mod;
pub mod io;
pub mod math;
pub mod physics;
pub mod sim;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::{Gains, GuidanceConfig, SimConfig};
pub use dynamics::{Body, RigidBody};
pub use error::{Error, Result};
pub use gnc::{GuidanceController, Mode, ModeKind};
