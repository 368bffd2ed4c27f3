//! Triangular surface faces and their cached coordinate frames
//!
//! Every face carries the transforms agents need each step, computed once
//! when the mesh is built:
//! - an orthonormal basis with `z` along the outward face normal
//! - world <-> face-local transforms (local `z` is the off-plane distance)
//! - the inverse "pyramid" matrix used for solid-angle containment
//! - its three corners expressed in the local frame

use glam::{Mat3, Vec2, Vec3};

/// Index of a face within its [`crate::mesh::SurfaceMesh`]
///
/// Navigation nodes use the same index, one node per face.
pub type FaceId = usize;

/// Relative slack allowed on pyramid coordinates
///
/// Points that sit exactly on an edge shared by two faces may then be claimed
/// by either face. Callers only ask "am I still on this face", so either
/// answer is acceptable.
pub const CONTAINMENT_TOLERANCE: f32 = 1e-5;

/// Orthonormal frame attached to a face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBasis {
    /// In-plane axis along the first edge (a → b)
    pub x: Vec3,
    /// In-plane axis completing the right-handed frame
    pub y: Vec3,
    /// Outward unit normal
    pub z: Vec3,
}

/// A triangle of the planet surface
///
/// Membership (`vertices`) never changes after the mesh is built. The only
/// mutable state is the grass marker.
#[derive(Debug, Clone)]
pub struct Face {
    /// Position of this face in the mesh face list
    pub id: FaceId,

    /// Vertex indices (a, b, c), counter-clockwise seen from outside
    pub vertices: [u32; 3],

    /// World positions of the three corners
    pub corners: [Vec3; 3],

    /// Local frame of the face plane
    pub basis: FaceBasis,

    /// Transposed basis; maps world offsets from corner `a` into the frame
    to_local: Mat3,

    /// Basis matrix; maps local coordinates back into world offsets
    from_local: Mat3,

    /// Inverse of the matrix whose columns are the three corners
    to_pyramid: Mat3,

    /// Corners in the local frame (their `z` is zero)
    local_corners: [Vec2; 3],

    grass: bool,
}

impl Face {
    /// Build a face and its cached transforms
    ///
    /// Returns `None` when the triangle is degenerate (zero area) or its plane
    /// passes through the origin, since neither the local frame nor the
    /// containment test is defined then.
    pub fn new(id: FaceId, vertices: [u32; 3], corners: [Vec3; 3]) -> Option<Self> {
        let [a, b, c] = corners;

        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        if normal == Vec3::ZERO {
            return None;
        }
        if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
        }

        let x = (b - a).normalize();
        let y = normal.cross(x);
        let basis = FaceBasis { x, y, z: normal };

        let from_local = Mat3::from_cols(x, y, normal);
        let to_local = from_local.transpose();

        // The determinant scales with the cube of the radius
        let pyramid = Mat3::from_cols(a, b, c);
        let scale = a.length() * b.length() * c.length();
        if pyramid.determinant().abs() <= f32::EPSILON * scale {
            return None;
        }
        let to_pyramid = pyramid.inverse();

        let local = |p: Vec3| (to_local * (p - a)).truncate();
        let local_corners = [Vec2::ZERO, local(b), local(c)];

        Some(Self {
            id,
            vertices,
            corners,
            basis,
            to_local,
            from_local,
            to_pyramid,
            local_corners,
            grass: false,
        })
    }

    /// Outward unit normal
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.basis.z
    }

    /// Average of the three corners
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.corners[0] + self.corners[1] + self.corners[2]) / 3.0
    }

    /// Express a world point in the face frame
    ///
    /// `x`/`y` are in-plane coordinates relative to corner `a`; `z` is the
    /// signed distance above the face plane.
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.to_local * (point - self.corners[0])
    }

    /// Map face-frame coordinates back to a world point
    #[inline]
    pub fn from_local(&self, local: Vec3) -> Vec3 {
        self.corners[0] + self.from_local * local
    }

    /// Rotate a world direction into the face frame (no translation)
    #[inline]
    pub fn to_local_vector(&self, vector: Vec3) -> Vec3 {
        self.to_local * vector
    }

    /// Rotate a face-frame direction back into world space
    #[inline]
    pub fn from_local_vector(&self, vector: Vec3) -> Vec3 {
        self.from_local * vector
    }

    /// Drop the component of `vector` along the face normal
    #[inline]
    pub fn tangent(&self, vector: Vec3) -> Vec3 {
        let mut local = self.to_local_vector(vector);
        local.z = 0.0;
        self.from_local_vector(local)
    }

    /// Weights `(wa, wb, wc)` with `point = wa*a + wb*b + wc*c`
    #[inline]
    pub fn pyramid_coords(&self, point: Vec3) -> Vec3 {
        self.to_pyramid * point
    }

    /// Whether `point` lies inside the solid angle this face subtends at the origin
    ///
    /// True when all three pyramid weights are non-negative (within
    /// [`CONTAINMENT_TOLERANCE`]). The origin itself belongs to no face.
    pub fn contains(&self, point: Vec3) -> bool {
        let weights = self.pyramid_coords(point);
        let total = weights.element_sum();
        total > 0.0 && weights.min_element() >= -CONTAINMENT_TOLERANCE * total
    }

    /// Whether face-local in-plane coordinates fall inside the triangle
    pub fn contains_local(&self, local: Vec2) -> bool {
        let [p0, p1, p2] = self.local_corners;
        let area2 = (p1 - p0).perp_dot(p2 - p0);
        if area2 == 0.0 {
            return false;
        }
        let s = (p2 - p0).perp_dot(local - p0) / -area2;
        let t = (p1 - p0).perp_dot(local - p0) / area2;
        let slack = -CONTAINMENT_TOLERANCE;
        s >= slack && t >= slack && 1.0 - s - t >= slack
    }

    /// Corners of the face in its own frame
    #[inline]
    pub fn local_corners(&self) -> [Vec2; 3] {
        self.local_corners
    }

    /// Whether grass has been planted on this face
    #[inline]
    pub fn has_grass(&self) -> bool {
        self.grass
    }

    pub(crate) fn set_grass(&mut self, grass: bool) {
        self.grass = grass;
    }
}
