//! Orbiting a landmark in distance bands

use glam::Vec3;
use tracing::trace;

use super::{Behavior, ConstrainToRadius, PathTo, Surface};
use crate::config::SteeringConfig;
use crate::nav::NavGraph;
use crate::position::SurfacePosition;

/// Distance band around a landmark, innermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitBand {
    /// Within the orbit ring; only pushed out if too close
    Ring,
    /// Between the ring and the outer radius; paths toward the landmark
    Approach,
    /// Beyond the outer radius; pulled straight in
    Outer,
}

/// Circles a landmark
///
/// Composite of three behaviors, one per [`OrbitBand`]. The agent's distance
/// to the landmark selects exactly one band; leaving a band deactivates its
/// behavior and activates the next. Agents further than the attraction
/// radius ignore the landmark entirely.
#[derive(Debug, Clone)]
pub struct LandmarkOrbit {
    landmark: SurfacePosition,
    ring: ConstrainToRadius,
    approach: PathTo,
    outer: ConstrainToRadius,
    orbit_radius: f32,
    outer_radius: f32,
    attraction_radius: f32,
    band: Option<OrbitBand>,
}

impl LandmarkOrbit {
    /// Build the three band behaviors around `landmark`
    ///
    /// The approach band's path is searched from `start` up front.
    pub fn new(
        start: &SurfacePosition,
        landmark: SurfacePosition,
        nav: &NavGraph,
        config: &SteeringConfig,
    ) -> Self {
        let center = landmark.cartesian();
        Self {
            landmark,
            ring: ConstrainToRadius::new(
                center,
                config.orbit_radius,
                Some(config.orbit_inner_radius),
                config.constrain_strength,
            ),
            approach: PathTo::new(start, landmark, nav, config),
            outer: ConstrainToRadius::new(center, config.orbit_outer_radius, None, config.constrain_strength),
            orbit_radius: config.orbit_radius,
            outer_radius: config.orbit_outer_radius,
            attraction_radius: config.orbit_attraction_radius,
            band: None,
        }
    }

    #[inline]
    pub fn landmark(&self) -> &SurfacePosition {
        &self.landmark
    }

    /// Band whose behavior ran on the last update, if any
    #[inline]
    pub fn band(&self) -> Option<OrbitBand> {
        self.band
    }

    /// Band a point at `distance` from the landmark falls in
    pub fn band_at(&self, distance: f32) -> OrbitBand {
        if distance <= self.orbit_radius {
            OrbitBand::Ring
        } else if distance <= self.outer_radius {
            OrbitBand::Approach
        } else {
            OrbitBand::Outer
        }
    }

    fn behavior_mut(&mut self, band: OrbitBand) -> &mut dyn Behavior {
        match band {
            OrbitBand::Ring => &mut self.ring,
            OrbitBand::Approach => &mut self.approach,
            OrbitBand::Outer => &mut self.outer,
        }
    }

    fn enter(&mut self, band: OrbitBand) {
        if self.band == Some(band) {
            return;
        }
        if let Some(previous) = self.band.take() {
            self.behavior_mut(previous).deactivate();
        }
        trace!(?band, "landmark orbit band change");
        self.behavior_mut(band).activate();
        self.band = Some(band);
    }
}

impl Behavior for LandmarkOrbit {
    fn is_active(&self, _last_velocity: Vec3, position: &SurfacePosition, _surface: Surface<'_>) -> bool {
        position.cartesian().distance(self.landmark.cartesian()) <= self.attraction_radius
    }

    fn deactivate(&mut self) {
        if let Some(band) = self.band.take() {
            self.behavior_mut(band).deactivate();
        }
    }

    fn update(
        &mut self,
        dt_ms: f32,
        last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        let distance = position.cartesian().distance(self.landmark.cartesian());
        let band = self.band_at(distance);
        self.enter(band);
        self.behavior_mut(band)
            .update(dt_ms, last_velocity, position, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceId;
    use crate::mesh::SurfaceMesh;
    use crate::terrain::UniformHeight;

    fn planet() -> (SurfaceMesh, NavGraph) {
        let mesh = SurfaceMesh::generate(3, &UniformHeight(1.0), 0.99).unwrap();
        let nav = NavGraph::build(&mesh);
        (mesh, nav)
    }

    fn face_at_distance(mesh: &SurfaceMesh, from: Vec3, lo: f32, hi: f32) -> FaceId {
        (0..mesh.face_count())
            .find(|&f| (lo..hi).contains(&mesh.face_centroid(f).distance(from)))
            .unwrap()
    }

    #[test]
    fn test_bands_are_exclusive() {
        let (mesh, nav) = planet();
        let landmark = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let orbit = LandmarkOrbit::new(&landmark, landmark, &nav, &SteeringConfig::default());

        assert_eq!(orbit.band_at(0.0), OrbitBand::Ring);
        assert_eq!(orbit.band_at(0.15), OrbitBand::Ring);
        assert_eq!(orbit.band_at(0.2), OrbitBand::Approach);
        assert_eq!(orbit.band_at(0.4), OrbitBand::Approach);
        assert_eq!(orbit.band_at(0.41), OrbitBand::Outer);
    }

    #[test]
    fn test_band_behaviors() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let config = SteeringConfig::default();
        let landmark = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let center = landmark.cartesian();

        // Settled in the ring: nothing to do
        let ring = SurfacePosition::at_face_centroid(&mesh, face_at_distance(&mesh, center, 0.07, 0.15)).unwrap();
        let mut orbit = LandmarkOrbit::new(&ring, landmark, &nav, &config);
        assert!(orbit.is_active(Vec3::ZERO, &ring, surface));
        assert_eq!(orbit.update(16.0, Vec3::ZERO, &ring, surface), Vec3::ZERO);
        assert_eq!(orbit.band(), Some(OrbitBand::Ring));

        // Too close: pushed outward
        let v = orbit.update(16.0, Vec3::ZERO, &landmark, surface);
        assert_eq!(v, Vec3::ZERO, "exact center has no outward direction");
        let close = SurfacePosition::from_cartesian(&mesh, center.lerp(ring.cartesian(), 0.2)).unwrap();
        let v = orbit.update(16.0, Vec3::ZERO, &close, surface);
        assert!(v.dot(close.cartesian() - center) > 0.0);

        // Approach band: paths toward the landmark
        let mid = SurfacePosition::at_face_centroid(&mesh, face_at_distance(&mesh, center, 0.25, 0.35)).unwrap();
        let v = orbit.update(16.0, Vec3::ZERO, &mid, surface);
        assert_eq!(orbit.band(), Some(OrbitBand::Approach));
        assert!(v.length() > 0.0);

        // Outer band: pulled toward the landmark
        let far = SurfacePosition::at_face_centroid(&mesh, face_at_distance(&mesh, center, 0.6, 1.0)).unwrap();
        let v = orbit.update(16.0, Vec3::ZERO, &far, surface);
        assert_eq!(orbit.band(), Some(OrbitBand::Outer));
        assert!(v.dot(center - far.cartesian()) > 0.0);

        orbit.deactivate();
        assert_eq!(orbit.band(), None);
    }

    #[test]
    fn test_attraction_radius() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let config = SteeringConfig {
            orbit_attraction_radius: 0.5,
            ..Default::default()
        };
        let landmark = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let center = landmark.cartesian();
        let orbit = LandmarkOrbit::new(&landmark, landmark, &nav, &config);

        let far = SurfacePosition::at_face_centroid(&mesh, face_at_distance(&mesh, center, 1.0, 1.5)).unwrap();
        assert!(!orbit.is_active(Vec3::ZERO, &far, surface));
        assert!(orbit.is_active(Vec3::ZERO, &landmark, surface));
    }
}
