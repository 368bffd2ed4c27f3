//! Surface agents and the landmarks they gather around

use glam::Vec3;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::SteeringConfig;
use crate::error::{PlanetError, Result};
use crate::face::FaceId;
use crate::mesh::SurfaceMesh;
use crate::nav::NavGraph;
use crate::position::SurfacePosition;
use crate::scheduler::Scheduler;
use crate::steering::{
    AvoidSubmergedArea, BehaviorList, ConstrainToRadius, LandmarkOrbit, PathTo, Surface, Wander,
};

/// A fixed point on the surface that agents can orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    position: SurfacePosition,
}

impl Landmark {
    /// Wrap a position that is already on the surface
    pub fn new(position: SurfacePosition) -> Self {
        Self { position }
    }

    /// Place a landmark where `point` projects onto the surface
    ///
    /// # Errors
    ///
    /// Returns `OffMesh` if the point does not project onto any face.
    pub fn place(mesh: &SurfaceMesh, point: Vec3) -> Result<Self> {
        Ok(Self::new(project(mesh, point)?))
    }

    #[inline]
    pub fn position(&self) -> &SurfacePosition {
        &self.position
    }
}

/// A small creature that walks the surface and plants grass
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
/// use rand::SeedableRng;
///
/// let mesh = SurfaceMesh::generate(2, &UniformHeight(1.0), 0.99).unwrap();
/// let nav = NavGraph::build(&mesh);
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
///
/// let mut nibble = Nibble::spawn(&mesh, Vec3::X, SteeringConfig::default()).unwrap();
/// nibble.wander(&mut rng, &mesh);
/// for _ in 0..60 {
///     nibble.step(16.0, Surface::new(&mesh, &nav));
/// }
/// assert!(nibble.position().is_consistent(&mesh, 1e-4));
/// ```
#[derive(Debug, Clone)]
pub struct Nibble {
    position: SurfacePosition,
    last_velocity: Vec3,
    behaviors: BehaviorList,
    grass: Scheduler,
    config: SteeringConfig,
}

impl Nibble {
    /// An idle agent at `position`
    pub fn new(position: SurfacePosition, config: SteeringConfig) -> Self {
        Self {
            position,
            last_velocity: Vec3::ZERO,
            behaviors: BehaviorList::new(),
            grass: Scheduler::new(config.grass_interval_ms),
            config,
        }
    }

    /// An idle agent where `point` projects onto the surface
    ///
    /// # Errors
    ///
    /// Returns `OffMesh` if the point does not project onto any face.
    pub fn spawn(mesh: &SurfaceMesh, point: Vec3, config: SteeringConfig) -> Result<Self> {
        Ok(Self::new(project(mesh, point)?, config))
    }

    #[inline]
    pub fn position(&self) -> &SurfacePosition {
        &self.position
    }

    #[inline]
    pub fn last_velocity(&self) -> Vec3 {
        self.last_velocity
    }

    #[inline]
    pub fn behaviors(&self) -> &BehaviorList {
        &self.behaviors
    }

    #[inline]
    pub fn behaviors_mut(&mut self) -> &mut BehaviorList {
        &mut self.behaviors
    }

    /// Wander around the current spot, staying out of the water
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R, mesh: &SurfaceMesh) {
        let config = &self.config;
        self.behaviors.clear();
        self.behaviors
            .push(Wander::new(rng, &self.position, mesh, config));
        self.behaviors
            .push(AvoidSubmergedArea::new(config.avoid_strength));
        self.behaviors.push(ConstrainToRadius::new(
            self.position.cartesian(),
            config.home_radius,
            None,
            config.constrain_strength,
        ));
    }

    /// Walk to `destination`
    ///
    /// Returns whether a path exists; without one the agent stands still.
    pub fn path_to(&mut self, destination: SurfacePosition, nav: &NavGraph) -> bool {
        let path_to = PathTo::new(&self.position, destination, nav, &self.config);
        let pathable = path_to.is_pathable();
        self.behaviors.replace([path_to]);
        pathable
    }

    /// Walk to a random reachable face
    ///
    /// Tries up to `path_retry_limit` destinations; returns the chosen face,
    /// or `None` (leaving the behaviors untouched) if none was reachable.
    pub fn path_to_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        surface: Surface<'_>,
    ) -> Option<FaceId> {
        let (dest, path) =
            surface
                .nav
                .find_path_to_random(self.position.face(), rng, self.config.path_retry_limit)?;
        let destination = SurfacePosition::at_face_centroid(surface.mesh, dest).ok()?;
        self.behaviors
            .replace([PathTo::with_path(destination, path, &self.config)]);
        Some(dest)
    }

    /// Circle `landmark` while staying out of the water
    pub fn orbit(&mut self, landmark: &Landmark, nav: &NavGraph) {
        let orbit = LandmarkOrbit::new(&self.position, *landmark.position(), nav, &self.config);
        self.behaviors.clear();
        self.behaviors
            .push(AvoidSubmergedArea::new(self.config.avoid_strength));
        self.behaviors.push(orbit);
    }

    /// Advance the agent by `dt_ms` milliseconds
    ///
    /// Returns the face to plant grass on when the grass timer fires. If the
    /// move would leave the mesh the agent stays put and loses its momentum.
    pub fn step(&mut self, dt_ms: f32, surface: Surface<'_>) -> Option<FaceId> {
        let mesh = surface.mesh;
        let face = self.position.face();
        let here = self.position.cartesian();

        let velocity = self
            .behaviors
            .update(dt_ms, self.last_velocity, &self.position, surface);

        // Keep the velocity tangent to the faceted shell
        self.last_velocity = mesh
            .place_on_surface_near(here + velocity, face)
            .map_or(Vec3::ZERO, |p| p - here);

        let target = here + self.last_velocity * (dt_ms / 1000.0);
        let moved = mesh
            .place_on_surface_near(target, face)
            .ok_or_else(|| PlanetError::off_mesh(target))
            .and_then(|placed| self.position.set_cartesian(mesh, placed));
        if let Err(err) = moved {
            warn!(%err, face, "nibble step left the mesh; holding position");
            self.last_velocity = Vec3::ZERO;
        }

        self.grass.update(dt_ms).then(|| self.position.face())
    }

    /// Move onto a rebuilt surface at the nearest point to where the agent was
    ///
    /// Clears momentum and behaviors; the caller assigns new ones.
    pub fn relocate(&mut self, mesh: &SurfaceMesh) -> Result<()> {
        self.position = project(mesh, self.position.cartesian())?;
        self.last_velocity = Vec3::ZERO;
        self.behaviors.clear();
        debug!(face = self.position.face(), "nibble relocated");
        Ok(())
    }
}

/// Project `point` onto the surface and locate it
fn project(mesh: &SurfaceMesh, point: Vec3) -> Result<SurfacePosition> {
    let placed = mesh
        .place_on_surface(point)
        .ok_or_else(|| PlanetError::off_mesh(point))?;
    SurfacePosition::from_cartesian(mesh, placed)
}
