//! Error types for surface generation, persistence and queries

use thiserror::Error;

/// Errors that can occur while building a planet or querying its surface
///
/// Routine "no result" outcomes (an unreachable destination, a point that no
/// face claims during a plain lookup) are reported as `Option`s by the query
/// methods themselves. This type covers the cases a caller has to reject or
/// recover from explicitly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanetError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted mesh could not be rebuilt into a surface
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// No face's solid angle contains the given point
    #[error("point ({x}, {y}, {z}) is not on any face")]
    OffMesh {
        /// World x coordinate of the rejected point
        x: f32,
        /// World y coordinate of the rejected point
        y: f32,
        /// World z coordinate of the rejected point
        z: f32,
    },

    /// Requested face ID does not exist
    #[error("face not found: {0}")]
    FaceNotFound(usize),
}

impl PlanetError {
    /// Build an [`PlanetError::OffMesh`] from a world-space point
    pub fn off_mesh(point: glam::Vec3) -> Self {
        PlanetError::OffMesh {
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, PlanetError>;
