//! Navigation and steering on a small procedural planet
//!
//! A subdivided icosahedron is displaced by a height function into a faceted
//! planet. Points are located on its faces, a navigation graph over the dry
//! faces answers shortest-path queries, and agents ("nibbles") move across
//! the surface by summing the velocities of composable steering behaviors.
//!
//! # Quick Start
//!
//! ```rust
//! use terrarium_nav::*;
//!
//! let config = PlanetConfigBuilder::new()
//!     .seed(42)
//!     .subdivision_level(2).unwrap()
//!     .build().unwrap();
//!
//! let planet = Planet::generate(config).unwrap();
//! let face = planet.find_face_at(Vec3::new(0.0, 1.0, 0.0)).unwrap();
//!
//! if let Some(path) = planet.nav().find_path(face, 0) {
//!     println!("{} hops", path.len() - 1);
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree over face centroids for fast point location
//! - `serde`: serialization for configuration, saved meshes and positions

pub mod config;
pub mod error;
pub mod face;
pub mod generation;
pub mod mesh;
pub mod nav;
pub mod nibble;
pub mod planet;
pub mod position;
pub mod scheduler;
pub mod steering;
pub mod terrain;
pub mod terrarium;

#[cfg(feature = "spatial-index")]
pub mod spatial;

pub use config::{PlanetConfig, PlanetConfigBuilder, SteeringConfig, MAX_SUBDIVISION_LEVEL};
pub use error::{PlanetError, Result};
pub use face::{Face, FaceBasis, FaceId, CONTAINMENT_TOLERANCE};
pub use generation::UnitIcosphere;
pub use mesh::{SavedMesh, SurfaceMesh};
pub use nav::{NavEdge, NavGraph, NavNode};
pub use nibble::{Landmark, Nibble};
pub use planet::Planet;
pub use position::{FacePosition, SurfacePosition};
pub use scheduler::Scheduler;
pub use steering::{
    AvoidSubmergedArea, Behavior, BehaviorList, ConstrainToRadius, LandmarkOrbit, OrbitBand,
    PathTo, SteeringBehavior, Surface, Wander,
};
pub use terrain::{sample_noise_1d, HeightSampler, NoiseHeightSampler, UniformHeight};
pub use terrarium::Terrarium;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

pub use glam::Vec3;
