//! Positions on the faceted surface
//!
//! Agents keep their world-space position and face-frame coordinates side by
//! side. The two views are only ever updated together, so
//! `mesh.from_face_coords(&pos.face_position()) == pos.cartesian()` holds
//! after every successful mutation.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PlanetError, Result};
use crate::face::FaceId;
use crate::mesh::SurfaceMesh;

/// A point expressed in one face's local frame
///
/// `uv.x` and `uv.y` lie in the face plane; `uv.z` is the height above it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePosition {
    /// Face whose frame `uv` is expressed in
    pub face: FaceId,
    /// Local coordinates relative to the face's first corner
    pub uv: Vec3,
}

impl FacePosition {
    #[inline]
    pub fn new(face: FaceId, uv: Vec3) -> Self {
        Self { face, uv }
    }

    /// The same in-plane coordinates with the height dropped
    #[inline]
    pub fn on_surface(self) -> Self {
        Self {
            face: self.face,
            uv: Vec3::new(self.uv.x, self.uv.y, 0.0),
        }
    }
}

/// World position paired with its containing face and face coordinates
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let mesh = SurfaceMesh::generate(2, &UniformHeight(1.0), 0.99).unwrap();
/// let mut pos = SurfacePosition::from_cartesian(&mesh, mesh.face_centroid(10)).unwrap();
/// assert_eq!(pos.face(), 10);
///
/// pos.set_cartesian(&mesh, mesh.face_centroid(11)).unwrap();
/// assert_eq!(pos.face(), 11);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePosition {
    cartesian: Vec3,
    coords: FacePosition,
}

impl SurfacePosition {
    /// Locate a world point on the mesh
    ///
    /// # Errors
    ///
    /// Returns `OffMesh` if no face contains the point.
    pub fn from_cartesian(mesh: &SurfaceMesh, point: Vec3) -> Result<Self> {
        let coords = mesh
            .to_face_coords(point)
            .ok_or_else(|| PlanetError::off_mesh(point))?;
        Ok(Self {
            cartesian: point,
            coords,
        })
    }

    /// Build a position from face coordinates
    ///
    /// # Errors
    ///
    /// Returns `FaceNotFound` if the face id is out of range.
    pub fn from_face(mesh: &SurfaceMesh, coords: FacePosition) -> Result<Self> {
        let face = mesh.get_face(coords.face)?;
        Ok(Self {
            cartesian: face.from_local(coords.uv),
            coords,
        })
    }

    /// Centroid of a face
    pub fn at_face_centroid(mesh: &SurfaceMesh, face: FaceId) -> Result<Self> {
        let centroid = mesh.get_face(face)?.centroid();
        Ok(Self {
            cartesian: centroid,
            coords: mesh.face_coords_in(centroid, face),
        })
    }

    #[inline]
    pub fn cartesian(&self) -> Vec3 {
        self.cartesian
    }

    #[inline]
    pub fn face(&self) -> FaceId {
        self.coords.face
    }

    #[inline]
    pub fn uv(&self) -> Vec3 {
        self.coords.uv
    }

    #[inline]
    pub fn face_position(&self) -> FacePosition {
        self.coords
    }

    /// Move to a new world point, searching outward from the current face
    ///
    /// On error the position is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `OffMesh` if no face contains the point.
    pub fn set_cartesian(&mut self, mesh: &SurfaceMesh, point: Vec3) -> Result<()> {
        let coords = mesh
            .to_face_coords_near(point, self.coords.face)
            .ok_or_else(|| PlanetError::off_mesh(point))?;
        self.cartesian = point;
        self.coords = coords;
        Ok(())
    }

    /// Move to new face coordinates
    ///
    /// # Errors
    ///
    /// Returns `FaceNotFound` if the face id is out of range; the position is
    /// left unchanged.
    pub fn set_face(&mut self, mesh: &SurfaceMesh, coords: FacePosition) -> Result<()> {
        *self = Self::from_face(mesh, coords)?;
        Ok(())
    }

    /// Whether the stored face coordinates reproduce the stored world point
    pub fn is_consistent(&self, mesh: &SurfaceMesh, tolerance: f32) -> bool {
        self.coords.face < mesh.face_count()
            && mesh.from_face_coords(&self.coords).distance(self.cartesian) <= tolerance
    }
}
