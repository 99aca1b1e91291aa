//! Airframe geometry and the mass properties derived from it.
//!
//! A hull is a set of convex polygons in the body frame (nose along +x), each
//! with a uniform density. Mass, centre of mass and rotational inertia follow
//! the usual triangle-fan decomposition around the first vertex.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MIN_AREA: f64 = 1e-9;

/// Integrated mass properties in the body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,              // kg
    pub center: Vector2<f64>,   // m, body frame
    pub inertia: f64,           // kg·m^2 about `center`
}

/// Convex polygon, counter-clockwise winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vector2<f64>>,
    #[serde(default = "unit_density")]
    pub density: f64,
}

fn unit_density() -> f64 {
    1.0
}

impl Polygon {
    pub fn new(vertices: Vec<Vector2<f64>>, density: f64) -> Self {
        Self { vertices, density }
    }

    /// Mass properties with inertia taken about the body origin, which is what
    /// parts need before they are combined.
    fn integrate(&self) -> Result<(f64, Vector2<f64>, f64)> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(Error::DegeneratePolygon { vertices: n, area: 0.0 });
        }

        let s = self.vertices[0];
        let mut area = 0.0;
        let mut center = Vector2::zeros();
        let mut i_ref = 0.0;

        for k in 0..n {
            let e1 = self.vertices[k] - s;
            let e2 = self.vertices[(k + 1) % n] - s;
            let d = e1.perp(&e2);
            let tri_area = 0.5 * d;
            area += tri_area;
            center += (e1 + e2) * (tri_area / 3.0);

            let int_x2 = e1.x * e1.x + e2.x * e1.x + e2.x * e2.x;
            let int_y2 = e1.y * e1.y + e2.y * e1.y + e2.y * e2.y;
            i_ref += (0.25 / 3.0 * d) * (int_x2 + int_y2);
        }

        if area < MIN_AREA {
            return Err(Error::DegeneratePolygon { vertices: n, area });
        }

        let mass = self.density * area;
        center /= area;
        let world_center = center + s;
        // Shift inertia from the reference vertex to the body origin.
        let inertia = self.density * i_ref
            + mass * (world_center.norm_squared() - center.norm_squared());
        Ok((mass, world_center, inertia))
    }

    pub fn mass_properties(&self) -> Result<MassProperties> {
        let (mass, center, i_origin) = self.integrate()?;
        Ok(MassProperties {
            mass,
            center,
            inertia: i_origin - mass * center.norm_squared(),
        })
    }
}

// ---------------------------------------------------------------------------
// Compound hull
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub parts: Vec<Polygon>,
}

impl Hull {
    pub fn new(parts: Vec<Polygon>) -> Self {
        Self { parts }
    }

    /// Default missile airframe: body, nose cone and tail flare at half scale.
    pub fn missile() -> Self {
        const SCALE: f64 = 0.5;
        let v = |x: f64, y: f64| Vector2::new(x * SCALE, y * SCALE);
        Self {
            parts: vec![
                Polygon::new(vec![v(-4.0, 2.0), v(-4.0, -2.0), v(6.0, -2.0), v(6.0, 2.0)], 1.0),
                Polygon::new(vec![v(6.0, 2.0), v(6.0, -2.0), v(10.0, 0.0)], 1.0),
                Polygon::new(vec![v(-5.0, 1.0), v(-5.0, -1.0), v(-4.0, 0.0)], 1.0),
            ],
        }
    }

    pub fn mass_properties(&self) -> Result<MassProperties> {
        if self.parts.is_empty() {
            return Err(Error::EmptyHull);
        }

        let mut mass = 0.0;
        let mut moment = Vector2::zeros();
        let mut i_origin = 0.0;
        for part in &self.parts {
            let (m, c, i) = part.integrate()?;
            mass += m;
            moment += c * m;
            i_origin += i;
        }

        let center = moment / mass;
        Ok(MassProperties {
            mass,
            center,
            inertia: i_origin - mass * center.norm_squared(),
        })
    }
}

impl Default for Hull {
    fn default() -> Self {
        Self::missile()
    }
}
