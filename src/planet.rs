//! Planet: a surface mesh together with its navigation graph

use std::time::Instant;
use tracing::info;

use glam::Vec3;

use crate::config::PlanetConfig;
use crate::error::Result;
use crate::face::FaceId;
use crate::mesh::{SavedMesh, SurfaceMesh};
use crate::nav::NavGraph;
use crate::steering::Surface;
use crate::terrain::{HeightSampler, NoiseHeightSampler};

/// A generated planet ready for agents
///
/// The navigation graph is always built from the current mesh; every way of
/// replacing the mesh rebuilds it.
///
/// # Examples
///
/// ```
/// use terrarium_nav::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .subdivision_level(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let planet = Planet::generate(config).unwrap();
/// assert_eq!(planet.mesh().face_count(), 320);
/// assert_eq!(planet.nav().node_count(), 320);
/// ```
#[derive(Debug, Clone)]
pub struct Planet {
    config: PlanetConfig,
    mesh: SurfaceMesh,
    nav: NavGraph,
}

impl Planet {
    /// Generate a planet with seeded noise heights
    pub fn generate(config: PlanetConfig) -> Result<Self> {
        Self::generate_with_sampler(config, &NoiseHeightSampler::from_config(&config))
    }

    /// Generate a planet with a custom height sampler
    ///
    /// # Example
    ///
    /// ```
    /// use terrarium_nav::*;
    ///
    /// let config = PlanetConfig { subdivision_level: 1, water_level: 0.99, ..Default::default() };
    /// let planet = Planet::generate_with_sampler(config, &UniformHeight(1.0)).unwrap();
    /// assert!(planet.nav().is_traversable(0));
    /// ```
    pub fn generate_with_sampler<S>(config: PlanetConfig, sampler: &S) -> Result<Self>
    where
        S: HeightSampler + ?Sized,
    {
        let mesh = SurfaceMesh::generate(config.subdivision_level, sampler, config.water_level)?;
        Ok(Self::from_mesh(config, mesh))
    }

    /// Rebuild a planet from a saved mesh
    ///
    /// The saved water level overrides the one in `config`.
    pub fn from_saved(config: PlanetConfig, saved: &SavedMesh) -> Result<Self> {
        let mesh = SurfaceMesh::load(saved)?;
        let config = PlanetConfig {
            water_level: mesh.water_level(),
            ..config
        };
        Ok(Self::from_mesh(config, mesh))
    }

    fn from_mesh(config: PlanetConfig, mesh: SurfaceMesh) -> Self {
        let nav = NavGraph::build(&mesh);
        Self { config, mesh, nav }
    }

    /// Replace the surface with one generated from `seed`
    ///
    /// Uses [`NoiseHeightSampler`] regardless of how the planet was first
    /// built. Every path, face id and position computed against the old
    /// surface is invalid afterwards.
    pub fn regenerate(&mut self, seed: u32) -> Result<()> {
        let start = Instant::now();
        let config = PlanetConfig { seed, ..self.config };
        *self = Self::generate(config)?;
        info!(seed, elapsed = ?start.elapsed(), "regenerated planet");
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    #[inline]
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    #[inline]
    pub fn nav(&self) -> &NavGraph {
        &self.nav
    }

    /// Read-only view handed to steering behaviors
    #[inline]
    pub fn surface(&self) -> Surface<'_> {
        Surface::new(&self.mesh, &self.nav)
    }

    /// Face containing `point`
    ///
    /// Uses the spatial index when the `spatial-index` feature is enabled,
    /// otherwise a linear scan.
    pub fn find_face_at(&self, point: Vec3) -> Option<FaceId> {
        #[cfg(feature = "spatial-index")]
        {
            self.mesh.find_face_at(point)
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            self.mesh.locate_face(point)
        }
    }

    /// Plant grass on a face
    pub fn make_grass(&mut self, face: FaceId) {
        self.mesh.make_grass(face);
    }

    /// Snapshot the surface for [`Planet::from_saved`]
    pub fn save(&self) -> SavedMesh {
        self.mesh.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanetConfigBuilder;
    use crate::terrain::UniformHeight;

    fn small_config(seed: u32) -> PlanetConfig {
        PlanetConfigBuilder::new()
            .seed(seed)
            .subdivision_level(2)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_matches_config() {
        let config = small_config(5);
        let planet = Planet::generate(config).unwrap();
        assert_eq!(planet.mesh().face_count(), config.face_count());
        assert_eq!(planet.mesh().vertex_count(), config.vertex_count());
        assert_eq!(planet.nav().node_count(), config.face_count());
        assert_eq!(planet.mesh().water_level(), config.water_level);
    }

    #[test]
    fn test_same_seed_same_planet() {
        let a = Planet::generate(small_config(31)).unwrap();
        let b = Planet::generate(small_config(31)).unwrap();
        let c = Planet::generate(small_config(32)).unwrap();
        assert_eq!(a.mesh().vertices(), b.mesh().vertices());
        assert_eq!(a.nav().edge_count(), b.nav().edge_count());
        assert_ne!(a.mesh().vertices(), c.mesh().vertices());
    }

    #[test]
    fn test_regenerate() {
        let mut planet = Planet::generate(small_config(1)).unwrap();
        planet.make_grass(3);
        planet.regenerate(2).unwrap();

        let fresh = Planet::generate(small_config(2)).unwrap();
        assert_eq!(planet.config().seed, 2);
        assert_eq!(planet.mesh().vertices(), fresh.mesh().vertices());
        assert_eq!(planet.mesh().grass_count(), 0);
        for id in 0..planet.nav().node_count() {
            assert_eq!(planet.nav().node(id).edges(), fresh.nav().node(id).edges());
        }
    }

    #[test]
    fn test_from_saved() {
        let config = PlanetConfig {
            subdivision_level: 2,
            water_level: 0.99,
            ..Default::default()
        };
        let planet = Planet::generate_with_sampler(config, &UniformHeight(1.0)).unwrap();
        let restored = Planet::from_saved(PlanetConfig::default(), &planet.save()).unwrap();
        assert_eq!(restored.config().water_level, 0.99);
        assert_eq!(restored.nav().edge_count(), planet.nav().edge_count());
        assert_eq!(restored.nav().find_path(0, 100), planet.nav().find_path(0, 100));
    }

    #[test]
    fn test_find_face_at() {
        let planet = Planet::generate(small_config(9)).unwrap();
        for id in (0..planet.mesh().face_count()).step_by(17) {
            let point = planet.mesh().face_centroid(id) * 2.0;
            assert_eq!(planet.find_face_at(point), Some(id));
        }
    }
}
