//! Composable steering behaviors
//!
//! Each behavior proposes a velocity (world units per second) for one agent.
//! A [`BehaviorList`] sums the proposals of every behavior that is currently
//! active; there is no arbitration or priority between them. Behaviors only
//! read the shared mesh and navigation graph through a [`Surface`], so any
//! number of agents can be stepped against the same planet.

mod avoid;
mod constrain;
mod landmark;
mod path_to;
mod wander;

pub use avoid::AvoidSubmergedArea;
pub use constrain::ConstrainToRadius;
pub use landmark::{LandmarkOrbit, OrbitBand};
pub use path_to::PathTo;
pub use wander::Wander;

use glam::Vec3;

use crate::mesh::SurfaceMesh;
use crate::nav::NavGraph;
use crate::position::SurfacePosition;

/// Read-only view of the planet handed to behaviors each step
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    /// Geometry used for face lookups and tangent projection
    pub mesh: &'a SurfaceMesh,
    /// Graph used by behaviors that path across faces
    pub nav: &'a NavGraph,
}

impl<'a> Surface<'a> {
    /// Borrow a mesh and the graph built from it
    pub fn new(mesh: &'a SurfaceMesh, nav: &'a NavGraph) -> Self {
        Self { mesh, nav }
    }
}

/// A single steering rule
pub trait Behavior {
    /// Whether this behavior contributes on the current step
    fn is_active(&self, last_velocity: Vec3, position: &SurfacePosition, surface: Surface<'_>) -> bool;

    /// Called when the behavior becomes active
    fn activate(&mut self) {}

    /// Called when the behavior stops being active
    fn deactivate(&mut self) {}

    /// Velocity contribution for a step of `dt_ms` milliseconds
    fn update(
        &mut self,
        dt_ms: f32,
        last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3;
}

/// The closed set of behaviors an agent can carry
#[derive(Debug, Clone)]
pub enum SteeringBehavior {
    PathTo(PathTo),
    Wander(Wander),
    AvoidSubmergedArea(AvoidSubmergedArea),
    ConstrainToRadius(ConstrainToRadius),
    LandmarkOrbit(LandmarkOrbit),
}

macro_rules! dispatch {
    ($self:expr, $b:ident => $body:expr) => {
        match $self {
            SteeringBehavior::PathTo($b) => $body,
            SteeringBehavior::Wander($b) => $body,
            SteeringBehavior::AvoidSubmergedArea($b) => $body,
            SteeringBehavior::ConstrainToRadius($b) => $body,
            SteeringBehavior::LandmarkOrbit($b) => $body,
        }
    };
}

impl SteeringBehavior {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            SteeringBehavior::PathTo(_) => "path_to",
            SteeringBehavior::Wander(_) => "wander",
            SteeringBehavior::AvoidSubmergedArea(_) => "avoid_submerged_area",
            SteeringBehavior::ConstrainToRadius(_) => "constrain_to_radius",
            SteeringBehavior::LandmarkOrbit(_) => "landmark_orbit",
        }
    }
}

impl Behavior for SteeringBehavior {
    fn is_active(&self, last_velocity: Vec3, position: &SurfacePosition, surface: Surface<'_>) -> bool {
        dispatch!(self, b => b.is_active(last_velocity, position, surface))
    }

    fn activate(&mut self) {
        dispatch!(self, b => b.activate())
    }

    fn deactivate(&mut self) {
        dispatch!(self, b => b.deactivate())
    }

    fn update(
        &mut self,
        dt_ms: f32,
        last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        dispatch!(self, b => b.update(dt_ms, last_velocity, position, surface))
    }
}

impl From<PathTo> for SteeringBehavior {
    fn from(b: PathTo) -> Self {
        SteeringBehavior::PathTo(b)
    }
}

impl From<Wander> for SteeringBehavior {
    fn from(b: Wander) -> Self {
        SteeringBehavior::Wander(b)
    }
}

impl From<AvoidSubmergedArea> for SteeringBehavior {
    fn from(b: AvoidSubmergedArea) -> Self {
        SteeringBehavior::AvoidSubmergedArea(b)
    }
}

impl From<ConstrainToRadius> for SteeringBehavior {
    fn from(b: ConstrainToRadius) -> Self {
        SteeringBehavior::ConstrainToRadius(b)
    }
}

impl From<LandmarkOrbit> for SteeringBehavior {
    fn from(b: LandmarkOrbit) -> Self {
        SteeringBehavior::LandmarkOrbit(b)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    behavior: SteeringBehavior,
    active: bool,
}

/// Behaviors owned by one agent, blended by summation
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let mesh = SurfaceMesh::generate(2, &UniformHeight(1.0), 0.99).unwrap();
/// let nav = NavGraph::build(&mesh);
/// let surface = Surface::new(&mesh, &nav);
/// let position = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
///
/// let mut list = BehaviorList::new();
/// list.push(ConstrainToRadius::new(Vec3::new(0.0, -1.0, 0.0), 0.5, None, 1.0));
/// list.push(AvoidSubmergedArea::new(1.0));
///
/// let velocity = list.update(16.0, Vec3::ZERO, &position, surface);
/// assert!(velocity.is_finite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BehaviorList {
    slots: Vec<Slot>,
}

impl BehaviorList {
    /// Create an empty list; its update yields zero velocity
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a behavior; it starts inactive and is activated on the next
    /// update if its predicate holds
    pub fn push(&mut self, behavior: impl Into<SteeringBehavior>) {
        self.slots.push(Slot {
            behavior: behavior.into(),
            active: false,
        });
    }

    /// Remove every behavior, deactivating the active ones first
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.active {
                slot.behavior.deactivate();
            }
        }
        self.slots.clear();
    }

    /// Swap the whole set of behaviors
    pub fn replace<I>(&mut self, behaviors: I)
    where
        I: IntoIterator,
        I::Item: Into<SteeringBehavior>,
    {
        self.clear();
        for behavior in behaviors {
            self.push(behavior);
        }
    }

    /// Number of behaviors held, active or not
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Behaviors in insertion order
    pub fn behaviors(&self) -> impl Iterator<Item = &SteeringBehavior> {
        self.slots.iter().map(|s| &s.behavior)
    }

    /// Whether the behavior at `index` was active on the last update
    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.active)
    }

    /// Sum of the velocities proposed by every active behavior
    ///
    /// Fires `activate`/`deactivate` on behaviors whose predicate changed
    /// since the previous call. The result is not yet projected onto the
    /// surface.
    pub fn update(
        &mut self,
        dt_ms: f32,
        last_velocity: Vec3,
        position: &SurfacePosition,
        surface: Surface<'_>,
    ) -> Vec3 {
        let mut velocity = Vec3::ZERO;
        for slot in &mut self.slots {
            let active = slot.behavior.is_active(last_velocity, position, surface);
            if active != slot.active {
                if active {
                    slot.behavior.activate();
                } else {
                    slot.behavior.deactivate();
                }
                slot.active = active;
            }
            if active {
                velocity += slot.behavior.update(dt_ms, last_velocity, position, surface);
            }
        }
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SteeringConfig;
    use crate::terrain::UniformHeight;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn planet() -> (SurfaceMesh, NavGraph) {
        let mesh = SurfaceMesh::generate(3, &UniformHeight(1.0), 0.99).unwrap();
        let nav = NavGraph::build(&mesh);
        (mesh, nav)
    }

    #[test]
    fn test_empty_list_is_still() {
        let (mesh, nav) = planet();
        let position = SurfacePosition::at_face_centroid(&mesh, 3).unwrap();
        let mut list = BehaviorList::new();
        assert!(list.is_empty());
        let v = list.update(16.0, Vec3::X, &position, Surface::new(&mesh, &nav));
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_outputs_are_additive() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let position = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let here = position.cartesian();

        // Two rings the agent is outside of, pulling in different directions
        let a = ConstrainToRadius::new(-here, 0.5, None, 1.0);
        let b = ConstrainToRadius::new(here.normalize().any_orthonormal_vector(), 0.1, None, 2.0);
        let dest = SurfacePosition::at_face_centroid(&mesh, 600).unwrap();
        let c = PathTo::new(&position, dest, &nav, &SteeringConfig::default());

        let v1 = a.clone().update(16.0, Vec3::ZERO, &position, surface);
        let v2 = b.clone().update(16.0, Vec3::ZERO, &position, surface);
        let v3 = c.clone().update(16.0, Vec3::ZERO, &position, surface);
        assert!(v1.length() > 0.0 && v2.length() > 0.0 && v3.length() > 0.0);

        let mut list = BehaviorList::new();
        list.push(a);
        list.push(b);
        let combined = list.update(16.0, Vec3::ZERO, &position, surface);
        assert!(combined.distance(v1 + v2) < 1e-6);

        list.push(c);
        let combined = list.update(16.0, Vec3::ZERO, &position, surface);
        assert!(combined.distance(v1 + v2 + v3) < 1e-6);
    }

    #[test]
    fn test_inactive_behaviors_do_not_contribute() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let position = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();

        let mut list = BehaviorList::new();
        list.push(ConstrainToRadius::new(position.cartesian(), 0.5, None, 1.0));
        list.push(AvoidSubmergedArea::new(1.0));
        let v = list.update(16.0, Vec3::ZERO, &position, surface);
        assert_eq!(v, Vec3::ZERO);
        assert!(!list.is_active(0));
        assert!(!list.is_active(1));
    }

    #[test]
    fn test_activation_edges() {
        let (mesh, nav) = planet();
        let surface = Surface::new(&mesh, &nav);
        let near = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let far_face = (0..mesh.face_count())
            .max_by(|&a, &b| {
                let da = mesh.face_centroid(a).distance(near.cartesian());
                let db = mesh.face_centroid(b).distance(near.cartesian());
                da.total_cmp(&db)
            })
            .unwrap();
        let far = SurfacePosition::at_face_centroid(&mesh, far_face).unwrap();

        let mut list = BehaviorList::new();
        list.push(ConstrainToRadius::new(near.cartesian(), 0.5, None, 1.0));

        list.update(16.0, Vec3::ZERO, &near, surface);
        assert!(!list.is_active(0));
        list.update(16.0, Vec3::ZERO, &far, surface);
        assert!(list.is_active(0));
        list.update(16.0, Vec3::ZERO, &near, surface);
        assert!(!list.is_active(0));
    }

    #[test]
    fn test_replace_and_clear() {
        let (mesh, _) = planet();
        let position = SurfacePosition::at_face_centroid(&mesh, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = SteeringConfig::default();

        let mut list = BehaviorList::new();
        list.push(Wander::new(&mut rng, &position, &mesh, &config));
        list.replace([
            SteeringBehavior::from(AvoidSubmergedArea::new(1.0)),
            ConstrainToRadius::new(Vec3::ZERO, 1.0, None, 1.0).into(),
        ]);
        let names: Vec<_> = list.behaviors().map(|b| b.name()).collect();
        assert_eq!(names, vec!["avoid_submerged_area", "constrain_to_radius"]);

        list.clear();
        assert!(list.is_empty());
    }
}
