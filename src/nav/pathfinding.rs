//! A* search over the face navigation graph.
//!
//! Every hop costs one, and the heuristic is the exact BFS hop distance
//! stored in the expanded node's row, so the first time the goal is popped
//! the path is hop-optimal. The open set is a `BinaryHeap` turned into a
//! min-heap by reversing `Ord`; ties on f are broken by the smaller face id
//! so the search is a pure function of the graph and endpoints.

use rand::Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, warn};

use super::NavGraph;
use crate::face::FaceId;

/// Entry in the open set
#[derive(PartialEq, Eq)]
struct OpenEntry {
    node: FaceId,
    f_score: u32,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: smallest f_score is "greatest".
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl NavGraph {
    /// Shortest path from `from` to `to`, both inclusive, in traversal order
    ///
    /// Returns `None` when `to` is not reachable from `from`, which is an
    /// ordinary outcome on planets split by water. A path from a face to
    /// itself is just that face.
    ///
    /// Panics if either id is out of range.
    pub fn find_path(&self, from: FaceId, to: FaceId) -> Option<Vec<FaceId>> {
        let n = self.node_count();
        assert!(
            from < n && to < n,
            "face id out of range: {} -> {} with {} nodes",
            from,
            to,
            n
        );
        if from == to {
            return Some(vec![from]);
        }
        let Some(h_start) = self.heuristic(from, to) else {
            debug!(from, to, "destination unreachable");
            return None;
        };

        let mut g_score = vec![u32::MAX; n];
        let mut came_from: Vec<Option<FaceId>> = vec![None; n];
        let mut closed = vec![false; n];

        g_score[from] = 0;
        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            node: from,
            f_score: h_start,
        });

        while let Some(OpenEntry { node: current, .. }) = open.pop() {
            if current == to {
                return Some(reconstruct_path(&came_from, from, to));
            }
            if closed[current] {
                continue;
            }
            closed[current] = true;

            let tentative_g = g_score[current] + 1;
            for neighbor in self.neighbors(current) {
                if closed[neighbor] || tentative_g >= g_score[neighbor] {
                    continue;
                }
                // Neighbors that cannot reach the goal never lead anywhere
                let Some(h) = self.heuristic(neighbor, to) else {
                    continue;
                };
                g_score[neighbor] = tentative_g;
                came_from[neighbor] = Some(current);
                open.push(OpenEntry {
                    node: neighbor,
                    f_score: tentative_g + h,
                });
            }
        }

        // Unreachable with a correct heuristic row; kept for robustness.
        debug!(from, to, "open set exhausted");
        None
    }

    /// Pick random destinations until one is reachable from `from`
    ///
    /// Tries at most `attempts` destinations other than `from`, each drawn
    /// fresh from `rng`, and returns the first `(destination, path)` found.
    /// Gives up with `None` rather than retrying an unreachable target.
    pub fn find_path_to_random<R: Rng + ?Sized>(
        &self,
        from: FaceId,
        rng: &mut R,
        attempts: usize,
    ) -> Option<(FaceId, Vec<FaceId>)> {
        for _ in 0..attempts {
            let dest = rng.gen_range(0..self.node_count());
            if dest == from {
                continue;
            }
            if let Some(path) = self.find_path(from, dest) {
                return Some((dest, path));
            }
        }
        warn!(from, attempts, "no reachable random destination");
        None
    }
}

fn reconstruct_path(came_from: &[Option<FaceId>], from: FaceId, to: FaceId) -> Vec<FaceId> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        match came_from[current] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
