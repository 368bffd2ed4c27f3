//! Pull agents out of submerged regions

use glam::Vec3;

use super::{Behavior, Surface};
use crate::position::SurfacePosition;

/// Steers an agent that ended up below the water radius back onto land
///
/// Heads for the nearest dry vertex of the face the agent is on, faster the
/// deeper the agent is. If every vertex of the face is submerged it heads for
/// the highest one instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidSubmergedArea {
    /// Velocity per unit of depth below the water level
    pub strength: f32,
}

impl AvoidSubmergedArea {
    /// Create the behavior with the given pull strength
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }
}

impl Behavior for AvoidSubmergedArea {
    fn is_active(&self, _last_velocity: Vec3, position: &SurfacePosition, surface: Surface<'_>) -> bool {
        surface.mesh.is_submerged(position.cartesian())
    }

    fn update(
        &mut self,
        _dt_ms: f32,
        _last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        let mesh = surface.mesh;
        let here = position.cartesian();
        if !mesh.is_submerged(here) {
            return Vec3::ZERO;
        }

        let vertices = mesh.face(position.face()).vertices;
        let nearest_dry = vertices
            .iter()
            .filter(|&&v| mesh.is_vertex_dry(v))
            .map(|&v| mesh.vertex(v))
            .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));
        let target = nearest_dry.unwrap_or_else(|| {
            vertices
                .iter()
                .map(|&v| mesh.vertex(v))
                .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
                .unwrap_or(here)
        });

        let water = mesh.water_level();
        let depth = ((water - here.length()) / water).clamp(0.0, 1.0);
        (target - here).normalize_or_zero() * depth * self.strength
    }
}
