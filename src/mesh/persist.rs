//! Plain-data snapshot of a surface mesh
//!
//! Only vertex positions, face index triples, the water radius and grass are
//! stored. Face frames and adjacency are rebuilt on load so a snapshot can
//! never disagree with the geometry it describes.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::SurfaceMesh;
use crate::error::{PlanetError, Result};

/// Serializable form of a [`SurfaceMesh`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedMesh {
    /// World positions, one `[x, y, z]` per vertex
    pub vertices: Vec<[f32; 3]>,
    /// Vertex index triples, one per face, in face id order
    pub faces: Vec<[u32; 3]>,
    /// Radius below which the surface counts as submerged
    pub water_level: f32,
    /// Ids of faces with grass
    #[cfg_attr(feature = "serde", serde(default))]
    pub grass: Vec<u32>,
}

impl SurfaceMesh {
    /// Snapshot the mesh
    pub fn save(&self) -> SavedMesh {
        SavedMesh {
            vertices: self.vertices.iter().map(|v| v.to_array()).collect(),
            faces: self.faces.iter().map(|f| f.vertices).collect(),
            water_level: self.water_level,
            grass: self
                .faces
                .iter()
                .filter(|f| f.has_grass())
                .map(|f| f.id as u32)
                .collect(),
        }
    }

    /// Rebuild a mesh from a snapshot
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` for out-of-range indices, degenerate faces or
    /// non-finite coordinates, and `FaceNotFound` for a grass id past the end.
    pub fn load(saved: &SavedMesh) -> Result<Self> {
        if let Some(bad) = saved
            .vertices
            .iter()
            .position(|v| v.iter().any(|c| !c.is_finite()))
        {
            return Err(PlanetError::InvalidMesh(format!(
                "vertex {} has a non-finite coordinate",
                bad
            )));
        }

        let vertices = saved.vertices.iter().map(|&v| Vec3::from_array(v)).collect();
        let mut mesh = Self::from_parts(vertices, &saved.faces, saved.water_level)?;

        for &id in &saved.grass {
            let id = id as usize;
            if id >= mesh.face_count() {
                return Err(PlanetError::FaceNotFound(id));
            }
            mesh.make_grass(id);
        }
        Ok(mesh)
    }
}
