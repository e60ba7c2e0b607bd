//! # Static Consistency Graph
//!
//! For a condition schema with parameters `p₀ … p_{k-1}`, the graph has
//! a vertex per `(parameter, object)` pair consistent with every unary
//! static body literal and an edge between vertices of distinct
//! parameters consistent with every binary static literal. It is built
//! once per schema at grounder construction and over-approximates the
//! state-dependent consistency the binding generator refines per call.

use crate::bitset::Bitset;
use crate::grounding::assignment_set::{Assignment, AssignmentSet};
use crate::pddl::ir::{ConjunctiveCondition, IrPool};

/// A vertex `(parameter, object)`; its index is its position in
/// [`StaticConsistencyGraph::vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub index: u32,
    pub parameter: u32,
    pub object: u32,
}

#[derive(Debug)]
pub struct StaticConsistencyGraph {
    pub vertices: Vec<Vertex>,
    /// Undirected edges as vertex-index pairs, `src.parameter < dst.parameter`.
    pub edges: Vec<(u32, u32)>,
    pub vertices_by_parameter: Vec<Vec<u32>>,
    pub objects_by_parameter: Vec<Vec<u32>>,
    /// Static adjacency over vertex indices; the per-state restriction
    /// intersects against this.
    pub adjacency: Vec<Bitset>,
}

impl StaticConsistencyGraph {
    pub fn build(
        pool: &IrPool,
        condition: &ConjunctiveCondition,
        static_sets: &AssignmentSet,
    ) -> Self {
        let arity = condition.arity;
        let num_objects = pool.objects.len() as u32;

        let mut vertices = Vec::new();
        let mut vertices_by_parameter = vec![Vec::new(); arity];
        let mut objects_by_parameter = vec![Vec::new(); arity];

        for parameter in 0..arity as u32 {
            for object in 0..num_objects {
                let assignment = Assignment::unary(parameter, object);
                if static_sets.literals_consistent(pool, &condition.statics, assignment, None, false)
                {
                    let index = vertices.len() as u32;
                    vertices.push(Vertex {
                        index,
                        parameter,
                        object,
                    });
                    vertices_by_parameter[parameter as usize].push(index);
                    objects_by_parameter[parameter as usize].push(object);
                }
            }
        }

        let mut edges = Vec::new();
        let mut adjacency = vec![Bitset::with_capacity(vertices.len()); vertices.len()];
        for &src in &vertices {
            for &dst in &vertices {
                if src.parameter >= dst.parameter {
                    continue;
                }
                let pair = Assignment::pair(src.parameter, src.object, dst.parameter, dst.object);
                if static_sets.literals_consistent(pool, &condition.statics, pair, None, false) {
                    edges.push((src.index, dst.index));
                    adjacency[src.index as usize].set(dst.index as usize);
                    adjacency[dst.index as usize].set(src.index as usize);
                }
            }
        }

        StaticConsistencyGraph {
            vertices,
            edges,
            vertices_by_parameter,
            objects_by_parameter,
            adjacency,
        }
    }
}
