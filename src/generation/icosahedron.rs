//! Geodesic icosphere construction
//!
//! Starts from the regular icosahedron and splits every triangle into four
//! per level, pushing new edge midpoints out to the unit sphere. Midpoints are
//! shared between the two triangles on either side of an edge, so the result
//! is a closed, watertight triangulation with `20 * 4^level` faces and
//! `10 * 4^level + 2` vertices.

use glam::Vec3;
use std::collections::HashMap;

/// Golden ratio φ = (1 + √5) / 2
const PHI: f32 = 1.618_034;

/// Icosahedron corners before normalization
const BASE_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// Icosahedron faces, counter-clockwise seen from outside
const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// A subdivided icosahedron on the unit sphere (geometry only, no heights)
#[derive(Debug, Clone, PartialEq)]
pub struct UnitIcosphere {
    /// Unit-length vertex directions
    pub directions: Vec<Vec3>,
    /// Triangles as indices into `directions`
    pub faces: Vec<[u32; 3]>,
}

impl UnitIcosphere {
    /// Build the icosphere at the given subdivision level
    ///
    /// # Example
    ///
    /// ```rust
    /// use terrarium_nav::generation::UnitIcosphere;
    ///
    /// let sphere = UnitIcosphere::new(2);
    /// assert_eq!(sphere.faces.len(), 320);
    /// assert_eq!(sphere.directions.len(), 162);
    /// ```
    pub fn new(level: u32) -> Self {
        let mut directions: Vec<Vec3> = BASE_VERTICES
            .iter()
            .map(|&v| Vec3::from_array(v).normalize())
            .collect();
        let mut faces = BASE_FACES.to_vec();

        for _ in 0..level {
            faces = subdivide(&mut directions, &faces);
        }

        Self { directions, faces }
    }
}

/// Split every face into four, sharing edge midpoints between neighbors
fn subdivide(directions: &mut Vec<Vec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut next = Vec::with_capacity(faces.len() * 4);

    for &[a, b, c] in faces {
        let ab = midpoint(directions, &mut midpoints, a, b);
        let bc = midpoint(directions, &mut midpoints, b, c);
        let ca = midpoint(directions, &mut midpoints, c, a);

        next.push([a, ab, ca]);
        next.push([ab, b, bc]);
        next.push([ca, bc, c]);
        next.push([ab, bc, ca]);
    }

    next
}

fn midpoint(
    directions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    *cache.entry(key).or_insert_with(|| {
        let mid = (directions[a as usize] + directions[b as usize]).normalize();
        directions.push(mid);
        (directions.len() - 1) as u32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_counts_per_level() {
        for level in 0..=4 {
            let sphere = UnitIcosphere::new(level);
            let faces = 20 * 4usize.pow(level);
            assert_eq!(sphere.faces.len(), faces);
            assert_eq!(sphere.directions.len(), faces / 2 + 2);
        }
    }

    #[test]
    fn test_directions_are_unit() {
        let sphere = UnitIcosphere::new(3);
        for d in &sphere.directions {
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let sphere = UnitIcosphere::new(2);
        for &[a, b, c] in &sphere.faces {
            let (a, b, c) = (
                sphere.directions[a as usize],
                sphere.directions[b as usize],
                sphere.directions[c as usize],
            );
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_every_edge_shared_by_two_faces() {
        let sphere = UnitIcosphere::new(2);
        let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
        for &[a, b, c] in &sphere.faces {
            for (p, q) in [(a, b), (b, c), (c, a)] {
                *edges.entry((p.min(q), p.max(q))).or_default() += 1;
            }
        }
        assert!(edges.values().all(|&count| count == 2));
    }

    #[test]
    fn test_no_duplicate_vertices() {
        let sphere = UnitIcosphere::new(3);
        let unique: HashSet<[i32; 3]> = sphere
            .directions
            .iter()
            .map(|d| (*d * 1e4).round().to_array().map(|x| x as i32))
            .collect();
        assert_eq!(unique.len(), sphere.directions.len());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(UnitIcosphere::new(3), UnitIcosphere::new(3));
    }
}
