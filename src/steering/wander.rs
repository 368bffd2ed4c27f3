//! Noise-driven wandering over the surface

use glam::{Quat, Vec3};
use rand::Rng;

use super::{Behavior, Surface};
use crate::config::SteeringConfig;
use crate::mesh::SurfaceMesh;
use crate::position::SurfacePosition;
use crate::terrain::sample_noise_1d;

/// Noise time advanced per millisecond of simulation
const NOISE_TIME_SCALE: f32 = 1.0 / 1500.0;

/// Throttle noise below `-1 / THROTTLE_GAIN` stops the agent
const THROTTLE_GAIN: f32 = 2.0;

/// Upper bound on the throttle multiplier (bursts)
const MAX_THROTTLE: f32 = 1.5;

/// Meanders across the surface
///
/// Heading turns about the local up axis by a smooth noise signal, and a
/// second noise channel modulates speed so the agent pauses and dashes
/// instead of moving at a constant pace.
#[derive(Debug, Clone)]
pub struct Wander {
    direction: Vec3,
    seed: u32,
    t: f32,
    speed: f32,
    rotation_speed: f32,
}

impl Wander {
    /// Start wandering from `position` in a random direction
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        position: &SurfacePosition,
        mesh: &SurfaceMesh,
        config: &SteeringConfig,
    ) -> Self {
        let seed = rng.gen();
        let face = mesh.face(position.face());
        let offset = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        let target = face.from_local(position.face_position().on_surface().uv + offset);
        let direction = (target - position.cartesian())
            .normalize_or(face.basis.x);

        Self {
            direction,
            seed,
            t: 0.0,
            speed: config.wander_speed,
            rotation_speed: config.wander_rotation_speed,
        }
    }

    /// Current unit heading
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Speed multiplier from the throttle channel at the current time
    fn throttle(&self) -> f32 {
        let noise = sample_noise_1d(self.t, self.seed.wrapping_add(1));
        (1.0 + noise * THROTTLE_GAIN).clamp(0.0, MAX_THROTTLE)
    }
}

impl Behavior for Wander {
    fn is_active(&self, _last_velocity: Vec3, _position: &SurfacePosition, _surface: Surface<'_>) -> bool {
        true
    }

    fn update(
        &mut self,
        dt_ms: f32,
        _last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        let up = position.cartesian().normalize_or_zero();
        if up == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let angle = sample_noise_1d(self.t, self.seed) * dt_ms * self.rotation_speed;
        let turned = Quat::from_axis_angle(up, angle) * self.direction;

        // Keep heading in the plane of the current face
        let tangent = surface.mesh.face(position.face()).tangent(turned);
        if let Some(direction) = tangent.try_normalize() {
            self.direction = direction;
        }

        let velocity = self.direction * self.speed * self.throttle();
        self.t += dt_ms * NOISE_TIME_SCALE;
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavGraph;
    use crate::terrain::UniformHeight;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn planet() -> (SurfaceMesh, NavGraph) {
        let mesh = SurfaceMesh::generate(3, &UniformHeight(1.0), 0.99).unwrap();
        let nav = NavGraph::build(&mesh);
        (mesh, nav)
    }

    #[test]
    fn test_initial_direction_is_tangent() {
        let (mesh, _) = planet();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for face in (0..mesh.face_count()).step_by(50) {
            let position = SurfacePosition::at_face_centroid(&mesh, face).unwrap();
            let wander = Wander::new(&mut rng, &position, &mesh, &SteeringConfig::default());
            assert!((wander.direction().length() - 1.0).abs() < 1e-5);
            assert!(wander.direction().dot(mesh.face(face).normal()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_seeded_wander_is_deterministic() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let position = SurfacePosition::at_face_centroid(&mesh, 10).unwrap();
        let config = SteeringConfig::default();

        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let mut wander = Wander::new(&mut rng, &position, &mesh, &config);
            (0..20)
                .map(|_| wander.update(16.0, Vec3::ZERO, &position, surface))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_speed_is_bounded_and_tangent() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let position = SurfacePosition::at_face_centroid(&mesh, 77).unwrap();
        let config = SteeringConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut wander = Wander::new(&mut rng, &position, &mesh, &config);

        let mut speeds = Vec::new();
        for _ in 0..2000 {
            let v = wander.update(16.0, Vec3::ZERO, &position, surface);
            assert!(v.length() <= config.wander_speed * MAX_THROTTLE + 1e-6);
            assert!(v.dot(mesh.face(77).normal()).abs() < 1e-5);
            speeds.push(v.length());
        }
        // The throttle channel actually varies the pace
        let min = speeds.iter().copied().fold(f32::INFINITY, f32::min);
        let max = speeds.iter().copied().fold(0.0, f32::max);
        assert!(max - min > config.wander_speed * 0.1);
    }

    #[test]
    fn test_heading_drifts() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let position = SurfacePosition::at_face_centroid(&mesh, 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut wander = Wander::new(&mut rng, &position, &mesh, &SteeringConfig::default());

        let initial = wander.direction();
        for _ in 0..3000 {
            wander.update(16.0, Vec3::ZERO, &position, surface);
        }
        assert!(wander.direction().dot(initial) < 0.9999);
    }
}
