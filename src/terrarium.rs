//! The simulated world: a planet, its nibbles and their landmarks

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{PlanetConfig, SteeringConfig};
use crate::error::Result;
use crate::face::FaceId;
use crate::nibble::{Landmark, Nibble};
use crate::planet::Planet;

/// A planet populated with agents
///
/// All randomness (wander headings, random destinations) comes from one
/// `ChaCha8Rng` seeded from the planet seed, so a terrarium driven by the same
/// calls and time steps evolves identically every run.
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(7)
///     .subdivision_level(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut terrarium = Terrarium::generate(config, SteeringConfig::default()).unwrap();
/// terrarium.spawn_nibble(Vec3::Y).unwrap();
/// for _ in 0..100 {
///     terrarium.step(16.0);
/// }
/// assert!(terrarium.planet().mesh().grass_count() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Terrarium {
    planet: Planet,
    steering: SteeringConfig,
    nibbles: Vec<Nibble>,
    landmarks: Vec<Landmark>,
    rng: ChaCha8Rng,
}

impl Terrarium {
    /// Wrap a planet with no agents; randomness is seeded from its config
    pub fn new(planet: Planet, steering: SteeringConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(planet.config().seed as u64);
        Self {
            planet,
            steering,
            nibbles: Vec::new(),
            landmarks: Vec::new(),
            rng,
        }
    }

    /// Generate a planet and wrap it in an empty terrarium
    pub fn generate(config: PlanetConfig, steering: SteeringConfig) -> Result<Self> {
        Ok(Self::new(Planet::generate(config)?, steering))
    }

    #[inline]
    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    #[inline]
    pub fn nibbles(&self) -> &[Nibble] {
        &self.nibbles
    }

    #[inline]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    #[inline]
    pub fn steering(&self) -> &SteeringConfig {
        &self.steering
    }

    /// Add a wandering nibble where `point` projects onto the surface
    ///
    /// Returns its index. If landmarks exist it orbits the latest one instead.
    pub fn spawn_nibble(&mut self, point: Vec3) -> Result<usize> {
        let mut nibble = Nibble::spawn(self.planet.mesh(), point, self.steering)?;
        match self.landmarks.last() {
            Some(landmark) => nibble.orbit(landmark, self.planet.nav()),
            None => nibble.wander(&mut self.rng, self.planet.mesh()),
        }
        debug!(face = nibble.position().face(), "spawned nibble");
        self.nibbles.push(nibble);
        Ok(self.nibbles.len() - 1)
    }

    /// Add a landmark and send every nibble to orbit it
    pub fn place_landmark(&mut self, point: Vec3) -> Result<usize> {
        let landmark = Landmark::place(self.planet.mesh(), point)?;
        for nibble in &mut self.nibbles {
            nibble.orbit(&landmark, self.planet.nav());
        }
        debug!(face = landmark.position().face(), "placed landmark");
        self.landmarks.push(landmark);
        Ok(self.landmarks.len() - 1)
    }

    /// Send one nibble to a random reachable face
    ///
    /// Returns the destination, or `None` if no reachable face turned up
    /// within the retry limit. Panics if `index` is out of range.
    pub fn send_to_random(&mut self, index: usize) -> Option<FaceId> {
        let surface = self.planet.surface();
        self.nibbles[index].path_to_random(&mut self.rng, surface)
    }

    /// Advance every nibble by `dt_ms`, then grow the grass they planted
    pub fn step(&mut self, dt_ms: f32) {
        let surface = self.planet.surface();
        let planted: Vec<FaceId> = self
            .nibbles
            .iter_mut()
            .filter_map(|nibble| nibble.step(dt_ms, surface))
            .collect();

        for face in planted {
            self.planet.make_grass(face);
        }
    }

    /// Swap in a planet generated from `seed`
    ///
    /// Every nibble and landmark is moved to the nearest point of the new
    /// surface; nibbles go back to wandering. On error the terrarium is left
    /// untouched.
    pub fn regenerate(&mut self, seed: u32) -> Result<()> {
        let config = PlanetConfig {
            seed,
            ..*self.planet.config()
        };
        self.replace_planet(Planet::generate(config)?)?;
        info!(
            seed,
            nibbles = self.nibbles.len(),
            landmarks = self.landmarks.len(),
            "terrarium regenerated"
        );
        Ok(())
    }

    /// Move every agent onto `planet` and make it the current planet
    ///
    /// The random stream is reseeded from the new planet's seed. Nothing is
    /// committed unless every nibble and landmark lands on the new surface.
    pub fn replace_planet(&mut self, planet: Planet) -> Result<()> {
        let mut rng = ChaCha8Rng::seed_from_u64(planet.config().seed as u64);
        let mesh = planet.mesh();

        let landmarks = self
            .landmarks
            .iter()
            .map(|landmark| Landmark::place(mesh, landmark.position().cartesian()))
            .collect::<Result<Vec<_>>>()?;

        let mut nibbles = self.nibbles.clone();
        for nibble in &mut nibbles {
            nibble.relocate(mesh)?;
            nibble.wander(&mut rng, mesh);
        }

        self.planet = planet;
        self.landmarks = landmarks;
        self.nibbles = nibbles;
        self.rng = rng;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanetConfigBuilder;
    use crate::mesh::SavedMesh;
    use crate::steering::{OrbitBand, SteeringBehavior};
    use crate::terrain::UniformHeight;

    fn dry_terrarium() -> Terrarium {
        let config = PlanetConfig {
            subdivision_level: 3,
            water_level: 0.99,
            ..Default::default()
        };
        let planet = Planet::generate_with_sampler(config, &UniformHeight(1.0)).unwrap();
        Terrarium::new(planet, SteeringConfig::default())
    }

    #[test]
    fn test_spawned_nibbles_wander() {
        let mut terrarium = dry_terrarium();
        let index = terrarium.spawn_nibble(Vec3::X).unwrap();
        let names: Vec<_> = terrarium.nibbles()[index].behaviors().behaviors().map(|b| b.name()).collect();
        assert_eq!(names, vec!["wander", "avoid_submerged_area", "constrain_to_radius"]);
        assert!(terrarium.spawn_nibble(Vec3::ZERO).is_err());
    }

    #[test]
    fn test_step_is_deterministic() {
        let run = || {
            let mut terrarium = dry_terrarium();
            terrarium.spawn_nibble(Vec3::X).unwrap();
            terrarium.spawn_nibble(Vec3::NEG_Z).unwrap();
            for _ in 0..200 {
                terrarium.step(16.0);
            }
            terrarium
                .nibbles()
                .iter()
                .map(|n| n.position().cartesian())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_landmark_switches_nibbles_to_orbit() {
        let mut terrarium = dry_terrarium();
        terrarium.spawn_nibble(Vec3::X).unwrap();
        terrarium.spawn_nibble(Vec3::Y).unwrap();
        terrarium.place_landmark(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(terrarium.landmarks().len(), 1);

        for nibble in terrarium.nibbles() {
            let names: Vec<_> = nibble.behaviors().behaviors().map(|b| b.name()).collect();
            assert_eq!(names, vec!["avoid_submerged_area", "landmark_orbit"]);
        }

        // Later arrivals join the orbit too
        let index = terrarium.spawn_nibble(Vec3::Z).unwrap();
        assert!(terrarium.nibbles()[index]
            .behaviors()
            .behaviors()
            .any(|b| matches!(b, SteeringBehavior::LandmarkOrbit(_))));
    }

    #[test]
    fn test_orbiting_nibbles_gather() {
        let mut terrarium = dry_terrarium();
        let landmark_point = Vec3::new(0.3, 1.0, 0.1);
        terrarium.place_landmark(landmark_point).unwrap();
        let center = terrarium.landmarks()[0].position().cartesian();

        // Start in the approach band
        let start = (0..terrarium.planet().mesh().face_count())
            .map(|f| terrarium.planet().mesh().face_centroid(f))
            .find(|c| (0.3..0.38).contains(&c.distance(center)))
            .unwrap();
        terrarium.spawn_nibble(start).unwrap();

        for _ in 0..2000 {
            terrarium.step(16.0);
        }
        let nibble = &terrarium.nibbles()[0];
        let orbit = nibble
            .behaviors()
            .behaviors()
            .find_map(|b| match b {
                SteeringBehavior::LandmarkOrbit(orbit) => Some(orbit),
                _ => None,
            })
            .unwrap();
        assert_eq!(orbit.band(), Some(OrbitBand::Ring));
        assert!(nibble.position().cartesian().distance(center) < terrarium.steering().orbit_radius + 0.05);
    }

    #[test]
    fn test_grass_grows_under_nibbles() {
        let mut terrarium = dry_terrarium();
        terrarium.spawn_nibble(Vec3::X).unwrap();
        assert_eq!(terrarium.planet().mesh().grass_count(), 0);

        // 1.6 s at one planting per 0.5 s
        for _ in 0..100 {
            terrarium.step(16.0);
        }
        let grown = terrarium.planet().mesh().grass_count();
        assert!((1..=3).contains(&grown), "{} faces grew grass", grown);
    }

    #[test]
    fn test_send_to_random() {
        let mut terrarium = dry_terrarium();
        terrarium.spawn_nibble(Vec3::X).unwrap();
        let dest = terrarium.send_to_random(0).unwrap();
        assert!(dest < terrarium.planet().mesh().face_count());
        let names: Vec<_> = terrarium.nibbles()[0].behaviors().behaviors().map(|b| b.name()).collect();
        assert_eq!(names, vec!["path_to"]);
    }

    #[test]
    fn test_regenerate_keeps_agents_on_surface() {
        let config = PlanetConfigBuilder::new()
            .seed(10)
            .subdivision_level(3)
            .unwrap()
            .build()
            .unwrap();
        let mut terrarium = Terrarium::generate(config, SteeringConfig::default()).unwrap();
        terrarium.spawn_nibble(Vec3::X).unwrap();
        terrarium.spawn_nibble(Vec3::NEG_Y).unwrap();
        terrarium.place_landmark(Vec3::Z).unwrap();
        for _ in 0..50 {
            terrarium.step(16.0);
        }

        terrarium.regenerate(11).unwrap();
        assert_eq!(terrarium.planet().config().seed, 11);

        let mesh = terrarium.planet().mesh();
        for nibble in terrarium.nibbles() {
            assert!(nibble.position().is_consistent(mesh, 1e-4));
            assert_eq!(nibble.behaviors().behaviors().next().map(|b| b.name()), Some("wander"));
        }
        for landmark in terrarium.landmarks() {
            assert!(landmark.position().is_consistent(mesh, 1e-4));
        }
        terrarium.step(16.0);
    }

    #[test]
    fn test_failed_replace_leaves_terrarium_untouched() {
        let mut terrarium = dry_terrarium();
        terrarium.spawn_nibble(Vec3::X).unwrap();
        terrarium.spawn_nibble(Vec3::NEG_X).unwrap();
        let before: Vec<_> = terrarium.nibbles().iter().map(|n| *n.position()).collect();
        let faces = terrarium.planet().mesh().face_count();

        // A single triangle on the +X side cannot hold the nibble at -X
        let patch = SavedMesh {
            vertices: vec![[1.0, -0.5, -0.5], [1.0, 0.5, -0.5], [1.0, 0.0, 0.5]],
            faces: vec![[0, 1, 2]],
            water_level: 0.5,
            grass: Vec::new(),
        };
        let planet = Planet::from_saved(*terrarium.planet().config(), &patch).unwrap();
        assert!(terrarium.replace_planet(planet).is_err());

        assert_eq!(terrarium.planet().mesh().face_count(), faces);
        let after: Vec<_> = terrarium.nibbles().iter().map(|n| *n.position()).collect();
        assert_eq!(before, after);
        for nibble in terrarium.nibbles() {
            assert!(nibble.position().is_consistent(terrarium.planet().mesh(), 1e-4));
        }
    }
}
