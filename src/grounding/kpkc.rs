//! # k-Clique Enumeration in k-Partite Graphs
//!
//! Every satisfying binding of a k-parameter condition is a k-clique in
//! the (state-restricted) consistency graph, one vertex per partition.
//! The enumerator is a branch-and-bound depth-first search that always
//! descends into the unassigned partition with the fewest remaining
//! candidates and prunes a branch as soon as the chosen vertices plus
//! the partitions that still have candidates cannot reach k.
//!
//! It is a manual-state iterator: callers pull cliques one at a time and
//! may drop it early without enumerating the rest.

use crate::bitset::Bitset;

/// Lazy k-clique enumerator over a k-partite graph.
///
/// `partitions[p]` lists the vertex indices of partition `p`;
/// `adjacency[v]` is the neighbour bitset of vertex `v` over the whole
/// vertex index space. The iterator owns both, so callers may build a
/// per-state restriction and hand it off.
pub struct KCliqueIter {
    adjacency: Vec<Bitset>,
    k: usize,
    stack: Vec<Frame>,
    partial: Vec<u32>,
    assigned: Vec<bool>,
}

struct Frame {
    /// Per partition: vertices still compatible with the partial clique.
    compatible: Vec<Bitset>,
    partition: usize,
    candidates: Vec<u32>,
    pos: usize,
}

impl KCliqueIter {
    pub fn new(partitions: Vec<Vec<u32>>, adjacency: Vec<Bitset>) -> Self {
        let k = partitions.len();
        let mut iter = KCliqueIter {
            adjacency,
            k,
            stack: Vec::new(),
            partial: Vec::new(),
            assigned: vec![false; k],
        };
        if k == 0 || partitions.iter().any(Vec::is_empty) {
            return iter; // no clique can exist
        }
        let compatible: Vec<Bitset> = partitions
            .iter()
            .map(|members| members.iter().map(|&v| v as usize).collect())
            .collect();
        iter.push_frame(compatible);
        iter
    }

    /// Choose the unassigned partition with the fewest candidates and
    /// open a frame over it.
    fn push_frame(&mut self, compatible: Vec<Bitset>) {
        let mut best = usize::MAX;
        let mut best_count = usize::MAX;
        for (partition, candidates) in compatible.iter().enumerate() {
            if self.assigned[partition] {
                continue;
            }
            let count = candidates.count_ones();
            if count < best_count {
                best = partition;
                best_count = count;
            }
        }
        debug_assert!(best != usize::MAX);

        let candidates: Vec<u32> = compatible[best].iter_ones().map(|v| v as u32).collect();
        self.assigned[best] = true;
        self.stack.push(Frame {
            compatible,
            partition: best,
            candidates,
            pos: 0,
        });
    }
}

impl Iterator for KCliqueIter {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return None;
            };

            if frame.pos >= frame.candidates.len() {
                self.assigned[frame.partition] = false;
                self.stack.pop();
                self.partial.pop();
                continue;
            }

            let vertex = frame.candidates[frame.pos];
            frame.pos += 1;
            self.partial.push(vertex);

            if self.partial.len() == self.k {
                let clique = self.partial.clone();
                self.partial.pop();
                return Some(clique);
            }

            // Restrict the remaining partitions to this vertex's
            // neighbourhood.
            let mut child: Vec<Bitset> = frame.compatible.clone();
            for (partition, candidates) in child.iter_mut().enumerate() {
                if !self.assigned[partition] {
                    candidates.intersect_with(&self.adjacency[vertex as usize]);
                }
            }

            // Bound: every unassigned partition must still offer a
            // candidate, else k is out of reach on this branch.
            let possible_additions = child
                .iter()
                .enumerate()
                .filter(|(partition, candidates)| {
                    !self.assigned[*partition] && !candidates.is_empty()
                })
                .count();

            if self.partial.len() + possible_additions == self.k {
                self.push_frame(child);
            } else {
                self.partial.pop();
            }
        }
    }
}
