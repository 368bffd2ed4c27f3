//! Nearest-centroid lookups for seeding face location
//!
//! Only available with the `spatial-index` feature. The nearest face centroid
//! is not always the containing face on an irregular mesh, so the result is a
//! starting hint for [`SurfaceMesh::locate_face_near`](crate::SurfaceMesh::locate_face_near)
//! rather than an answer.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over unit face-centroid directions
///
/// Construction is O(n log n) and happens once per mesh; queries are O(log n).
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build an index from one direction per face, in face-id order
    ///
    /// # Example
    ///
    /// ```
    /// use terrarium_nav::*;
    ///
    /// let directions = vec![Vec3::X, Vec3::Y, Vec3::Z];
    /// let index = SpatialIndex::new(&directions);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), 0);
    /// ```
    pub fn new(directions: &[Vec3]) -> Self {
        let points: Vec<[f32; 3]> = directions.iter().map(|d| d.to_array()).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Id of the entry nearest to `direction`
    pub fn find_nearest(&self, direction: Vec3) -> usize {
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&direction.to_array());
        result.item
    }
}
