//! Path following: A* across faces, then seek-and-arrive toward each
//! shared-edge waypoint

use glam::Vec3;
use tracing::debug;

use super::{Behavior, Surface};
use crate::config::SteeringConfig;
use crate::face::FaceId;
use crate::nav::NavGraph;
use crate::position::SurfacePosition;

/// Follows a face path to a destination point
///
/// The path is computed when the behavior is created and again whenever the
/// agent turns up on a face that is not part of it. Between faces the agent
/// aims for the midpoint of the edge it is about to cross; on the last face
/// it aims for the destination itself and slows down as it approaches.
#[derive(Debug, Clone)]
pub struct PathTo {
    destination: SurfacePosition,
    path: Option<Vec<FaceId>>,
    accel: f32,
    max_speed: f32,
    target_distance: f32,
}

impl PathTo {
    /// Follow the shortest path from `start`'s face to `destination`
    ///
    /// # Arguments
    ///
    /// * `start` - Where the agent currently is; only its face is used
    /// * `destination` - Point to arrive at
    /// * `nav` - Graph searched for the initial path
    /// * `config` - Source of `accel`, `max_speed` and `target_distance`
    ///
    /// # Returns
    ///
    /// The behavior, even when no path exists; check [`PathTo::is_pathable`].
    ///
    /// # Performance
    ///
    /// Runs one A* search, bounded by the size of the start's component.
    pub fn new(
        start: &SurfacePosition,
        destination: SurfacePosition,
        nav: &NavGraph,
        config: &SteeringConfig,
    ) -> Self {
        let mut path_to = Self {
            destination,
            path: None,
            accel: config.accel,
            max_speed: config.max_speed,
            target_distance: config.target_distance,
        };
        path_to.repath(start.face(), nav);
        path_to
    }

    /// Follow an already computed path
    ///
    /// `path` must start on the agent's face and end on the destination's.
    pub fn with_path(destination: SurfacePosition, path: Vec<FaceId>, config: &SteeringConfig) -> Self {
        Self {
            destination,
            path: Some(path),
            accel: config.accel,
            max_speed: config.max_speed,
            target_distance: config.target_distance,
        }
    }

    #[inline]
    pub fn destination(&self) -> &SurfacePosition {
        &self.destination
    }

    #[inline]
    pub fn path(&self) -> Option<&[FaceId]> {
        self.path.as_deref()
    }

    /// Whether a path to the destination exists
    #[inline]
    pub fn is_pathable(&self) -> bool {
        self.path.is_some()
    }

    /// Whether `position` is within the target distance of the destination
    pub fn has_arrived(&self, position: &SurfacePosition) -> bool {
        position.cartesian().distance_squared(self.destination.cartesian())
            < self.target_distance * self.target_distance
    }

    fn repath(&mut self, from: FaceId, nav: &NavGraph) {
        self.path = nav.find_path(from, self.destination.face());
        debug!(
            from,
            to = self.destination.face(),
            hops = self.path.as_ref().map(|p| p.len().saturating_sub(1)),
            "path_to repath"
        );
    }

    /// Position along the path `index` the agent on `path[index]` steers for
    fn waypoint(&self, path: &[FaceId], index: usize, surface: Surface<'_>) -> Vec3 {
        match path.get(index + 1) {
            None => self.destination.cartesian(),
            Some(&next) => surface
                .nav
                .find_centroid(path[index], next)
                .unwrap_or_else(|| surface.mesh.face_centroid(next)),
        }
    }
}

impl Behavior for PathTo {
    fn is_active(&self, _last_velocity: Vec3, _position: &SurfacePosition, _surface: Surface<'_>) -> bool {
        self.is_pathable()
    }

    fn update(
        &mut self,
        _dt_ms: f32,
        last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        if !self.is_pathable() || self.has_arrived(position) {
            return Vec3::ZERO;
        }

        let face = position.face();
        let on_path = |path: &Option<Vec<FaceId>>| path.as_ref()?.iter().position(|&f| f == face);
        let index = match on_path(&self.path) {
            Some(index) => index,
            None => {
                self.repath(face, surface.nav);
                match on_path(&self.path) {
                    Some(index) => index,
                    None => return Vec3::ZERO,
                }
            }
        };

        let Some(path) = self.path.as_deref() else {
            return Vec3::ZERO;
        };
        let is_final = index + 1 == path.len();
        let waypoint = self.waypoint(path, index, surface);

        let mut desired = waypoint - position.cartesian();
        if !is_final {
            desired = desired.normalize_or_zero() * self.max_speed;
        }
        let delta = (desired - last_velocity).clamp_length_max(self.accel);

        let velocity = surface.mesh.face(face).tangent(last_velocity + delta);
        velocity.clamp_length_max(self.max_speed)
    }
}
