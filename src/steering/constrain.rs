//! Ring constraint: keep an agent between two distances from a point

use glam::Vec3;

use super::{Behavior, Surface};
use crate::position::SurfacePosition;

/// Keeps an agent inside a ring around a point
///
/// Silent while the agent is between `inner_radius` (if any) and `radius`
/// of `center`. Outside the ring it pulls back toward the center, inside the
/// inner radius it pushes away, in both cases proportionally to how far past
/// the boundary the agent is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstrainToRadius {
    /// Point the ring is centered on
    pub center: Vec3,
    /// Outer edge of the ring
    pub radius: f32,
    /// Inner edge of the ring; `None` allows the center itself
    pub inner_radius: Option<f32>,
    /// Velocity per unit of distance past either edge
    pub strength: f32,
}

impl ConstrainToRadius {
    /// Create a ring constraint; `inner_radius` must be below `radius`
    pub fn new(center: Vec3, radius: f32, inner_radius: Option<f32>, strength: f32) -> Self {
        Self {
            center,
            radius,
            inner_radius,
            strength,
        }
    }

    /// Whether `point` lies outside the allowed ring
    pub fn is_violated_at(&self, point: Vec3) -> bool {
        let distance = point.distance(self.center);
        distance > self.radius || self.inner_radius.is_some_and(|inner| distance < inner)
    }

    /// Corrective velocity for an agent at `point`
    ///
    /// `fallback` is the outward direction used when the agent sits exactly on
    /// the center, where the offset gives none.
    pub fn velocity_at(&self, point: Vec3, fallback: Vec3) -> Vec3 {
        let offset = point - self.center;
        let distance = offset.length();

        if distance > self.radius {
            return -offset / distance * (distance - self.radius) * self.strength;
        }
        match self.inner_radius {
            Some(inner) if distance < inner => {
                let outward = if distance > f32::EPSILON {
                    offset / distance
                } else {
                    fallback.normalize_or_zero()
                };
                outward * (inner - distance) * self.strength
            }
            _ => Vec3::ZERO,
        }
    }
}

impl Behavior for ConstrainToRadius {
    fn is_active(&self, _last_velocity: Vec3, position: &SurfacePosition, _surface: Surface<'_>) -> bool {
        self.is_violated_at(position.cartesian())
    }

    fn update(
        &mut self,
        _dt_ms: f32,
        _last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        let tangent = surface.mesh.face(position.face()).basis.x;
        self.velocity_at(position.cartesian(), tangent)
    }
}
