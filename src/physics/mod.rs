pub mod hull;

pub use hull::{Hull, MassProperties, Polygon};
