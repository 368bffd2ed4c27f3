//! The faceted planet surface
//!
//! `SurfaceMesh` is an arena of vertices and [`Face`]s indexed by integer ids.
//! Navigation nodes, agent positions and paths all refer to faces by the same
//! [`FaceId`], so faces are never duplicated or reordered after construction.

mod persist;

pub use persist::SavedMesh;

use glam::Vec3;
use rand::Rng;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::error::{PlanetError, Result};
use crate::face::{Face, FaceId};
use crate::generation::UnitIcosphere;
use crate::position::FacePosition;
use crate::terrain::HeightSampler;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Edge-hops explored by [`SurfaceMesh::locate_face_near`] before falling back
/// to a full scan; three hops cover every face sharing a vertex with the hint.
const LOCAL_SEARCH_DEPTH: usize = 3;

/// Triangulated planet surface with cached per-face frames
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let mesh = SurfaceMesh::generate(2, &UniformHeight(1.0), 0.99).unwrap();
/// assert_eq!(mesh.face_count(), 320);
///
/// let face = mesh.locate_face(Vec3::new(0.2, 0.9, 0.1)).unwrap();
/// assert!(mesh.in_face(Vec3::new(0.2, 0.9, 0.1), face));
/// ```
#[derive(Clone)]
pub struct SurfaceMesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    edge_neighbors: Vec<Vec<FaceId>>,
    water_level: f32,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl std::fmt::Debug for SurfaceMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMesh")
            .field("vertices", &self.vertices.len())
            .field("faces", &self.faces.len())
            .field("water_level", &self.water_level)
            .finish()
    }
}

impl SurfaceMesh {
    /// Build a geodesic icosphere and displace its vertices by `sampler`
    ///
    /// Each unit vertex direction is scaled by `sampler.height(direction)`.
    /// The face count is `20 * 4^level`. A pure sampler makes the result
    /// fully reproducible.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` if the sampler produces a non-positive or
    /// non-finite radius, or the displacement collapses a face.
    pub fn generate<S>(level: u32, sampler: &S, water_level: f32) -> Result<Self>
    where
        S: HeightSampler + ?Sized,
    {
        let start = Instant::now();
        let sphere = UnitIcosphere::new(level);

        let vertices = sphere
            .directions
            .iter()
            .map(|&direction| {
                let radius = sampler.height(direction);
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(PlanetError::InvalidMesh(format!(
                        "height sampler returned radius {} for direction {:?}",
                        radius, direction
                    )));
                }
                Ok(direction * radius)
            })
            .collect::<Result<Vec<_>>>()?;

        let mesh = Self::from_parts(vertices, &sphere.faces, water_level)?;
        debug!(
            level,
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            elapsed = ?start.elapsed(),
            "generated surface mesh"
        );
        Ok(mesh)
    }

    /// Assemble a mesh from explicit vertices and vertex-index triangles
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` if the lists are empty, an index is out of range,
    /// or a face is degenerate.
    pub fn from_parts(vertices: Vec<Vec3>, faces: &[[u32; 3]], water_level: f32) -> Result<Self> {
        if vertices.is_empty() || faces.is_empty() {
            return Err(PlanetError::InvalidMesh(format!(
                "mesh needs vertices and faces (got {} and {})",
                vertices.len(),
                faces.len()
            )));
        }

        let faces = faces
            .iter()
            .enumerate()
            .map(|(id, &indices)| {
                let corners = indices.map(|i| vertices.get(i as usize).copied());
                let [Some(a), Some(b), Some(c)] = corners else {
                    return Err(PlanetError::InvalidMesh(format!(
                        "face {} references a missing vertex: {:?}",
                        id, indices
                    )));
                };
                Face::new(id, indices, [a, b, c]).ok_or_else(|| {
                    PlanetError::InvalidMesh(format!("face {} is degenerate: {:?}", id, indices))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let edge_neighbors = build_edge_neighbors(&faces);

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let directions: Vec<Vec3> = faces.iter().map(|f| f.centroid().normalize()).collect();
            SpatialIndex::new(&directions)
        };

        Ok(Self {
            vertices,
            faces,
            edge_neighbors,
            water_level,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// All vertex positions
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// All faces, indexed by [`FaceId`]
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Vertex position by index
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn vertex(&self, index: u32) -> Vec3 {
        self.vertices[index as usize]
    }

    /// Face by ID
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id]
    }

    /// Face by ID, or `FaceNotFound`
    pub fn get_face(&self, id: FaceId) -> Result<&Face> {
        self.faces.get(id).ok_or(PlanetError::FaceNotFound(id))
    }

    /// Radius below which the surface counts as submerged
    #[inline]
    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    /// Whether a point lies below the water radius
    #[inline]
    pub fn is_submerged(&self, point: Vec3) -> bool {
        point.length_squared() < self.water_level * self.water_level
    }

    /// Whether a vertex lies strictly above the water radius
    #[inline]
    pub fn is_vertex_dry(&self, index: u32) -> bool {
        self.vertex(index).length_squared() > self.water_level * self.water_level
    }

    /// Faces sharing an edge with `id` (three on a closed mesh)
    #[inline]
    pub fn edge_neighbors(&self, id: FaceId) -> &[FaceId] {
        &self.edge_neighbors[id]
    }

    /// Average of the face's corners
    #[inline]
    pub fn face_centroid(&self, id: FaceId) -> Vec3 {
        self.faces[id].centroid()
    }

    /// Outward unit normal of a face
    #[inline]
    pub fn face_normal(&self, id: FaceId) -> Vec3 {
        self.faces[id].normal()
    }

    /// Pick a face uniformly at random
    pub fn random_face<R: Rng + ?Sized>(&self, rng: &mut R) -> FaceId {
        rng.gen_range(0..self.faces.len())
    }

    /// Whether `point` is inside the solid angle of `face`
    #[inline]
    pub fn in_face(&self, point: Vec3, face: FaceId) -> bool {
        self.faces[face].contains(point)
    }

    /// Find the face whose solid angle contains `point`
    ///
    /// Linear scan returning the lowest matching face id. Points exactly on a
    /// shared edge may belong to either neighbor; the scan order decides.
    /// Returns `None` for the origin or any point no face claims.
    pub fn locate_face(&self, point: Vec3) -> Option<FaceId> {
        self.faces.iter().position(|face| face.contains(point))
    }

    /// Like [`locate_face`](Self::locate_face), but starts next to `hint`
    ///
    /// Tests the hint first, then faces up to a few edge-hops away, and only
    /// scans the whole mesh when the point moved further than that.
    pub fn locate_face_near(&self, point: Vec3, hint: FaceId) -> Option<FaceId> {
        if hint >= self.faces.len() {
            return self.locate_face(point);
        }
        if self.in_face(point, hint) {
            return Some(hint);
        }

        let mut visited = vec![hint];
        let mut frontier = vec![hint];
        for _ in 0..LOCAL_SEARCH_DEPTH {
            let mut next = Vec::new();
            for &face in &frontier {
                for &neighbor in self.edge_neighbors(face) {
                    if visited.contains(&neighbor) {
                        continue;
                    }
                    if self.in_face(point, neighbor) {
                        return Some(neighbor);
                    }
                    visited.push(neighbor);
                    next.push(neighbor);
                }
            }
            frontier = next;
        }

        self.locate_face(point)
    }

    /// Find the containing face using the centroid KD-tree as a starting hint
    #[cfg(feature = "spatial-index")]
    pub fn find_face_at(&self, point: Vec3) -> Option<FaceId> {
        let direction = point.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let hint = self.spatial_index.find_nearest(direction);
        self.locate_face_near(point, hint)
    }

    /// Locate `point` and express it in its face's frame
    ///
    /// The returned `uv.z` is the distance off the face plane; zero it before
    /// converting back if the result should lie on the surface.
    pub fn to_face_coords(&self, point: Vec3) -> Option<FacePosition> {
        self.locate_face(point).map(|face| self.face_coords_in(point, face))
    }

    /// [`to_face_coords`](Self::to_face_coords) searching outward from `hint`
    pub fn to_face_coords_near(&self, point: Vec3, hint: FaceId) -> Option<FacePosition> {
        self.locate_face_near(point, hint)
            .map(|face| self.face_coords_in(point, face))
    }

    /// Express `point` in the frame of a known face
    #[inline]
    pub fn face_coords_in(&self, point: Vec3, face: FaceId) -> FacePosition {
        FacePosition::new(face, self.faces[face].to_local(point))
    }

    /// Convert face-frame coordinates back to a world point
    #[inline]
    pub fn from_face_coords(&self, coords: &FacePosition) -> Vec3 {
        self.faces[coords.face].from_local(coords.uv)
    }

    /// Project `point` onto the faceted surface along its face normal
    ///
    /// Returns `None` if no face contains the point.
    pub fn place_on_surface(&self, point: Vec3) -> Option<Vec3> {
        self.to_face_coords(point)
            .map(|coords| self.from_face_coords(&coords.on_surface()))
    }

    /// [`place_on_surface`](Self::place_on_surface) searching outward from `hint`
    ///
    /// A point whose projection onto the hint's plane lands inside the hint
    /// triangle is placed there without any search.
    pub fn place_on_surface_near(&self, point: Vec3, hint: FaceId) -> Option<Vec3> {
        if let Some(face) = self.faces.get(hint) {
            let local = face.to_local(point).truncate();
            if face.contains_local(local) {
                return Some(face.from_local(local.extend(0.0)));
            }
        }
        self.to_face_coords_near(point, hint)
            .map(|coords| self.from_face_coords(&coords.on_surface()))
    }

    /// Whether grass grows on a face
    #[inline]
    pub fn has_grass(&self, id: FaceId) -> bool {
        self.faces[id].has_grass()
    }

    /// Plant grass on a face
    pub fn make_grass(&mut self, id: FaceId) {
        self.faces[id].set_grass(true);
    }

    /// Number of faces with grass
    pub fn grass_count(&self) -> usize {
        self.faces.iter().filter(|f| f.has_grass()).count()
    }
}

/// For each face, the faces sharing one of its edges, in edge order ab, bc, ca
fn build_edge_neighbors(faces: &[Face]) -> Vec<Vec<FaceId>> {
    let mut by_edge: HashMap<(u32, u32), Vec<FaceId>> = HashMap::with_capacity(faces.len() * 3 / 2);
    for face in faces {
        for (p, q) in face_edges(face.vertices) {
            by_edge.entry((p.min(q), p.max(q))).or_default().push(face.id);
        }
    }

    faces
        .iter()
        .map(|face| {
            let mut neighbors = Vec::with_capacity(3);
            for (p, q) in face_edges(face.vertices) {
                for &other in &by_edge[&(p.min(q), p.max(q))] {
                    if other != face.id && !neighbors.contains(&other) {
                        neighbors.push(other);
                    }
                }
            }
            neighbors
        })
        .collect()
}

#[inline]
fn face_edges([a, b, c]: [u32; 3]) -> [(u32, u32); 3] {
    [(a, b), (b, c), (c, a)]
}
