pub mod event;
pub mod runner;
pub mod scenario;

pub use event::{default_detectors, EventDetector, EventKind, SimEvent};
pub use runner::{simulate, simulate_with, FlightLog, Snapshot};
pub use scenario::{Command, Marker, Scenario, Spawn};
