use std::collections::VecDeque;

use nalgebra::Vector2;

/// Ordered waypoints, consumed front first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointQueue {
    points: VecDeque<Vector2<f64>>,
}

impl WaypointQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<Vector2<f64>> {
        self.points.pop_front()
    }

    pub fn front(&self) -> Option<&Vector2<f64>> {
        self.points.front()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector2<f64>> {
        self.points.iter()
    }
}

impl FromIterator<Vector2<f64>> for WaypointQueue {
    fn from_iter<I: IntoIterator<Item = Vector2<f64>>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

impl From<Vec<Vector2<f64>>> for WaypointQueue {
    fn from(points: Vec<Vector2<f64>>) -> Self {
        Self { points: points.into() }
    }
}
