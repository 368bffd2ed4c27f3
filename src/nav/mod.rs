//! Navigation graph over mesh faces
//!
//! One [`NavNode`] per face, sharing the face's id. An edge `i → j` exists
//! when the faces share an edge (two vertices) and `j` is traversable, i.e. at
//! least two of its three vertices lie above the water radius. Edges are
//! directed: a submerged face still has edges out onto dry land, so an agent
//! that slipped into the water can path back out, but nothing paths into it.
//!
//! Every node keeps a row of breadth-first hop distances to every other node.
//! A* in [`pathfinding`] uses the row of the node being expanded as an exact,
//! consistent heuristic.
//!
//! All storage is `Vec`-indexed by [`FaceId`] and built in a fixed order, so
//! two graphs built from identical meshes are identical.

mod pathfinding;

use glam::Vec3;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::info;

use crate::face::FaceId;
use crate::mesh::SurfaceMesh;

/// Hop distance stored for nodes a BFS never reached
const UNREACHABLE: u16 = u16::MAX;

/// A directed connection into a traversable neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavEdge {
    /// Face this edge leads to
    pub to: FaceId,
    /// Midpoint of the shared mesh edge, used as the crossing waypoint
    pub centroid: Vec3,
}

/// Navigation data for one face
#[derive(Debug, Clone)]
pub struct NavNode {
    /// Mesh face this node stands for (equal to its index in the graph)
    pub face: FaceId,
    /// Whether at least two of the face's vertices are above water
    pub traversable: bool,
    edges: Vec<NavEdge>,
    heuristic: Vec<u16>,
    connectedness: usize,
}

impl NavNode {
    /// Outgoing edges, ordered by neighbor id
    #[inline]
    pub fn edges(&self) -> &[NavEdge] {
        &self.edges
    }
}

/// Face adjacency graph with precomputed hop-distance tables
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let mesh = SurfaceMesh::generate(2, &UniformHeight(1.0), 0.99).unwrap();
/// let nav = NavGraph::build(&mesh);
///
/// let path = nav.find_path(0, 200).expect("dry sphere is fully connected");
/// assert_eq!(path.first(), Some(&0));
/// assert_eq!(path.last(), Some(&200));
/// assert_eq!(nav.heuristic(0, 200), Some(path.len() as u32 - 1));
/// ```
#[derive(Debug, Clone)]
pub struct NavGraph {
    nodes: Vec<NavNode>,
}

impl NavGraph {
    /// Build adjacency and heuristic tables for every face of `mesh`
    ///
    /// Adjacency compares every pair of faces, O(F²). It runs once per mesh.
    pub fn build(mesh: &SurfaceMesh) -> Self {
        let start = Instant::now();
        let faces = mesh.faces();

        let mut nodes: Vec<NavNode> = faces
            .iter()
            .map(|face| {
                let dry = face
                    .vertices
                    .iter()
                    .filter(|&&v| mesh.is_vertex_dry(v))
                    .count();
                NavNode {
                    face: face.id,
                    traversable: dry >= 2,
                    edges: Vec::new(),
                    heuristic: Vec::new(),
                    connectedness: 0,
                }
            })
            .collect();

        for i in 0..faces.len() {
            for j in (i + 1)..faces.len() {
                let Some((p, q)) = shared_edge(faces[i].vertices, faces[j].vertices) else {
                    continue;
                };
                let centroid = (mesh.vertex(p) + mesh.vertex(q)) * 0.5;
                if nodes[j].traversable {
                    nodes[i].edges.push(NavEdge { to: j, centroid });
                }
                if nodes[i].traversable {
                    nodes[j].edges.push(NavEdge { to: i, centroid });
                }
            }
        }
        for node in &mut nodes {
            node.edges.sort_by_key(|e| e.to);
        }

        let adjacency_elapsed = start.elapsed();
        let mut graph = Self { nodes };
        for id in 0..graph.nodes.len() {
            graph.build_heuristic(id);
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            traversable = graph.nodes.iter().filter(|n| n.traversable).count(),
            adjacency = ?adjacency_elapsed,
            total = ?start.elapsed(),
            "built navigation graph"
        );
        graph
    }

    /// Breadth-first search from `node`, storing the hop distance to every
    /// node it reaches as that node's heuristic row
    ///
    /// Panics if `node` is out of range.
    pub fn build_heuristic(&mut self, node: FaceId) {
        let mut row = vec![UNREACHABLE; self.nodes.len()];
        let mut queue = VecDeque::new();
        row[node] = 0;
        queue.push_back(node);

        let mut reached = 0;
        while let Some(current) = queue.pop_front() {
            reached += 1;
            let next = row[current].saturating_add(1);
            for edge in &self.nodes[current].edges {
                if row[edge.to] == UNREACHABLE {
                    row[edge.to] = next;
                    queue.push_back(edge.to);
                }
            }
        }

        let target = &mut self.nodes[node];
        target.heuristic = row;
        target.connectedness = reached;
    }

    /// Number of nodes (one per mesh face)
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    #[inline]
    pub fn node(&self, id: FaceId) -> &NavNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn is_traversable(&self, id: FaceId) -> bool {
        self.nodes[id].traversable
    }

    /// Ids of the faces reachable in one hop from `id`
    pub fn neighbors(&self, id: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.nodes[id].edges.iter().map(|e| e.to)
    }

    /// Number of nodes reachable from `id`, including itself
    #[inline]
    pub fn connectedness(&self, id: FaceId) -> usize {
        self.nodes[id].connectedness
    }

    /// Hop distance from `from` to `to`, or `None` if `to` is unreachable
    #[inline]
    pub fn heuristic(&self, from: FaceId, to: FaceId) -> Option<u32> {
        match self.nodes[from].heuristic[to] {
            UNREACHABLE => None,
            hops => Some(hops as u32),
        }
    }

    /// Midpoint of the mesh edge crossed when stepping from `from` to `to`
    ///
    /// Returns `None` if there is no edge `from → to`.
    pub fn find_centroid(&self, from: FaceId, to: FaceId) -> Option<Vec3> {
        let edges = &self.nodes[from].edges;
        edges
            .binary_search_by_key(&to, |e| e.to)
            .ok()
            .map(|i| edges[i].centroid)
    }
}

/// The two vertices a pair of faces shares, if they share an edge
fn shared_edge(a: [u32; 3], b: [u32; 3]) -> Option<(u32, u32)> {
    let mut shared = a.iter().copied().filter(|v| b.contains(v));
    let p = shared.next()?;
    let q = shared.next()?;
    Some((p, q))
}

impl std::fmt::Display for NavGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NavGraph({} nodes, {} edges)", self.node_count(), self.edge_count())
    }
}
