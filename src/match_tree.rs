//! # Match Tree
//!
//! A static index from atom-truth combinations to the ground elements
//! (actions or axioms) applicable under them. Interior nodes test one
//! ground fluent/derived atom or one ground numeric constraint; leaves
//! carry element indices. The walker descends the branch matching the
//! dense state plus every don't-care branch, so elements reaching a leaf
//! have had their whole condition tested along the path and are yielded
//! without re-verification.
//!
//! Construction is greedy: at each node the builder splits on the atom
//! or constraint mentioned by the most remaining elements, breaking ties
//! by first appearance, and stops when nothing mentioned remains. The
//! degenerate split shapes (true/false/don't-care in any combination)
//! collapse into one node variant with optional children.

use crate::grounding::{GroundCondition, GroundNumericConstraint, GroundNumericExpr};
use crate::pddl::ir::Kind;
use crate::state::DenseState;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// One element to index: a dense id plus its ground condition.
#[derive(Debug, Clone)]
pub struct MatchElement {
    pub id: u32,
    pub condition: GroundCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SplitKey {
    Atom(Kind, u32),
    Numeric(GroundNumericConstraint),
}

#[derive(Debug)]
enum MatchNode {
    Atom {
        kind: Kind,
        atom: u32,
        on_true: Option<Box<MatchNode>>,
        on_false: Option<Box<MatchNode>>,
        dontcare: Option<Box<MatchNode>>,
    },
    Numeric {
        constraint: GroundNumericConstraint,
        on_true: Box<MatchNode>,
        dontcare: Option<Box<MatchNode>>,
    },
    Leaf {
        elements: Vec<u32>,
    },
}

/// Build-time counters, exposed through the evaluator event handlers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchTreeStatistics {
    pub num_elements: usize,
    pub num_atom_nodes: usize,
    pub num_numeric_nodes: usize,
    pub num_leaf_nodes: usize,
    pub construction_millis: u64,
}

pub struct MatchTree {
    root: Option<MatchNode>,
    statistics: MatchTreeStatistics,
}

impl MatchTree {
    /// Build the tree over `elements`. Immutable afterwards.
    pub fn build(elements: Vec<MatchElement>) -> Self {
        let start = Instant::now();
        let mut statistics = MatchTreeStatistics {
            num_elements: elements.len(),
            ..MatchTreeStatistics::default()
        };
        let root = if elements.is_empty() {
            None
        } else {
            let mut used = HashSet::new();
            Some(build_node(elements, &mut used, &mut statistics))
        };
        statistics.construction_millis = start.elapsed().as_millis() as u64;
        MatchTree { root, statistics }
    }

    pub fn statistics(&self) -> &MatchTreeStatistics {
        &self.statistics
    }

    /// Walk the tree for `dense`, yielding the ids of exactly the
    /// elements whose condition holds, in tree order.
    pub fn applicable<'a>(
        &'a self,
        dense: &'a DenseState,
        static_values: &'a [(u32, f64)],
    ) -> MatchTreeIter<'a> {
        MatchTreeIter {
            stack: self.root.as_ref().map(|node| vec![node]).unwrap_or_default(),
            leaf: None,
            dense,
            static_values,
        }
    }
}

fn build_node(
    elements: Vec<MatchElement>,
    used: &mut HashSet<SplitKey>,
    statistics: &mut MatchTreeStatistics,
) -> MatchNode {
    let Some(split) = select_split(&elements, used) else {
        statistics.num_leaf_nodes += 1;
        return MatchNode::Leaf {
            elements: elements.into_iter().map(|e| e.id).collect(),
        };
    };

    let mut on_true = Vec::new();
    let mut on_false = Vec::new();
    let mut dontcare = Vec::new();
    for element in elements {
        match split {
            SplitKey::Atom(kind, atom) => {
                let (pos, neg) = match kind {
                    Kind::Fluent => (&element.condition.fluent_pos, &element.condition.fluent_neg),
                    Kind::Derived => {
                        (&element.condition.derived_pos, &element.condition.derived_neg)
                    }
                    Kind::Static => unreachable!("static atoms are discharged before indexing"),
                };
                if pos.get(atom as usize) {
                    on_true.push(element);
                } else if neg.get(atom as usize) {
                    on_false.push(element);
                } else {
                    dontcare.push(element);
                }
            }
            SplitKey::Numeric(constraint) => {
                if element.condition.numerics.contains(&constraint) {
                    on_true.push(element);
                } else {
                    dontcare.push(element);
                }
            }
        }
    }

    used.insert(split);
    let child = |subset: Vec<MatchElement>,
                 used: &mut HashSet<SplitKey>,
                 statistics: &mut MatchTreeStatistics| {
        if subset.is_empty() {
            None
        } else {
            Some(Box::new(build_node(subset, used, statistics)))
        }
    };
    let node = match split {
        SplitKey::Atom(kind, atom) => {
            statistics.num_atom_nodes += 1;
            MatchNode::Atom {
                kind,
                atom,
                on_true: child(on_true, used, statistics),
                on_false: child(on_false, used, statistics),
                dontcare: child(dontcare, used, statistics),
            }
        }
        SplitKey::Numeric(constraint) => {
            statistics.num_numeric_nodes += 1;
            MatchNode::Numeric {
                constraint,
                on_true: child(on_true, used, statistics)
                    .unwrap_or_else(|| Box::new(MatchNode::Leaf { elements: Vec::new() })),
                dontcare: child(dontcare, used, statistics),
            }
        }
    };
    used.remove(&split);
    node
}

/// Highest static frequency among the splits the current elements still
/// mention; ties go to the split seen first in element order.
fn select_split(elements: &[MatchElement], used: &HashSet<SplitKey>) -> Option<SplitKey> {
    let mut order: Vec<SplitKey> = Vec::new();
    let mut frequency: HashMap<SplitKey, usize> = HashMap::new();

    let mut visit = |key: SplitKey, order: &mut Vec<SplitKey>| {
        if used.contains(&key) {
            return;
        }
        let count = frequency.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    };

    for element in elements {
        let condition = &element.condition;
        for atom in condition.fluent_pos.iter_ones().chain(condition.fluent_neg.iter_ones()) {
            visit(SplitKey::Atom(Kind::Fluent, atom as u32), &mut order);
        }
        for atom in condition
            .derived_pos
            .iter_ones()
            .chain(condition.derived_neg.iter_ones())
        {
            visit(SplitKey::Atom(Kind::Derived, atom as u32), &mut order);
        }
        for constraint in &condition.numerics {
            visit(SplitKey::Numeric(*constraint), &mut order);
        }
    }

    let mut best: Option<(SplitKey, usize)> = None;
    for key in order {
        let count = frequency[&key];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

/// Lazy walker over the tree for one dense state.
pub struct MatchTreeIter<'a> {
    stack: Vec<&'a MatchNode>,
    leaf: Option<(&'a [u32], usize)>,
    dense: &'a DenseState,
    static_values: &'a [(u32, f64)],
}

impl Iterator for MatchTreeIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some((elements, pos)) = &mut self.leaf {
                if *pos < elements.len() {
                    let id = elements[*pos];
                    *pos += 1;
                    return Some(id);
                }
                self.leaf = None;
            }

            let node = self.stack.pop()?;
            match node {
                MatchNode::Leaf { elements } => {
                    self.leaf = Some((elements, 0));
                }
                MatchNode::Atom {
                    kind,
                    atom,
                    on_true,
                    on_false,
                    dontcare,
                } => {
                    if let Some(child) = dontcare {
                        self.stack.push(child);
                    }
                    let truth = match kind {
                        Kind::Fluent => self.dense.fluent.get(*atom as usize),
                        Kind::Derived => self.dense.derived.get(*atom as usize),
                        Kind::Static => unreachable!(),
                    };
                    let branch = if truth { on_true } else { on_false };
                    if let Some(child) = branch {
                        self.stack.push(child);
                    }
                }
                MatchNode::Numeric {
                    constraint,
                    on_true,
                    dontcare,
                } => {
                    if let Some(child) = dontcare {
                        self.stack.push(child);
                    }
                    if constraint_holds(constraint, self.dense, self.static_values) {
                        self.stack.push(on_true);
                    }
                }
            }
        }
    }
}

fn constraint_holds(
    constraint: &GroundNumericConstraint,
    dense: &DenseState,
    static_values: &[(u32, f64)],
) -> bool {
    let value = |expr: GroundNumericExpr| -> Option<f64> {
        match expr {
            GroundNumericExpr::Constant(v) => Some(v),
            GroundNumericExpr::Fterm(fterm) => dense.numeric_value(fterm).or_else(|| {
                static_values
                    .iter()
                    .find(|(f, _)| *f == fterm)
                    .map(|(_, v)| *v)
            }),
        }
    };
    match (value(constraint.lhs), value(constraint.rhs)) {
        (Some(lhs), Some(rhs)) => constraint.op.eval(lhs, rhs),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::Bitset;

    fn condition(pos: &[u32], neg: &[u32]) -> GroundCondition {
        let mut out = GroundCondition::default();
        for &atom in pos {
            out.fluent_pos.set(atom as usize);
        }
        for &atom in neg {
            out.fluent_neg.set(atom as usize);
        }
        out
    }

    fn dense(atoms: &[u32]) -> DenseState {
        let mut state = DenseState::new();
        for &atom in atoms {
            state.fluent.set(atom as usize);
        }
        state
    }

    fn applicable_ids(tree: &MatchTree, state: &DenseState) -> Vec<u32> {
        let mut ids: Vec<u32> = tree.applicable(state, &[]).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_walk_matches_direct_evaluation() {
        let elements = vec![
            MatchElement {
                id: 0,
                condition: condition(&[0, 1], &[]),
            },
            MatchElement {
                id: 1,
                condition: condition(&[0], &[2]),
            },
            MatchElement {
                id: 2,
                condition: condition(&[], &[]),
            },
            MatchElement {
                id: 3,
                condition: condition(&[2], &[0]),
            },
        ];
        let tree = MatchTree::build(elements.clone());

        for atoms in [
            vec![],
            vec![0],
            vec![0, 1],
            vec![0, 2],
            vec![2],
            vec![0, 1, 2],
        ] {
            let state = dense(&atoms);
            let expected: Vec<u32> = elements
                .iter()
                .filter(|e| e.condition.holds(&state, &[]))
                .map(|e| e.id)
                .collect();
            assert_eq!(applicable_ids(&tree, &state), expected, "atoms {atoms:?}");
        }
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        let tree = MatchTree::build(Vec::new());
        assert!(tree.applicable(&dense(&[]), &[]).next().is_none());
        assert_eq!(tree.statistics().num_leaf_nodes, 0);
    }

    #[test]
    fn test_all_positive_on_same_atom_still_tests_it() {
        // Both elements require atom 5; the path must test it, so a
        // state without atom 5 yields neither.
        let elements = vec![
            MatchElement {
                id: 0,
                condition: condition(&[5], &[]),
            },
            MatchElement {
                id: 1,
                condition: condition(&[5, 6], &[]),
            },
        ];
        let tree = MatchTree::build(elements);
        assert_eq!(applicable_ids(&tree, &dense(&[])), Vec::<u32>::new());
        assert_eq!(applicable_ids(&tree, &dense(&[5])), vec![0]);
        assert_eq!(applicable_ids(&tree, &dense(&[5, 6])), vec![0, 1]);
    }

    #[test]
    fn test_statistics_count_nodes() {
        let elements = vec![
            MatchElement {
                id: 0,
                condition: condition(&[1], &[]),
            },
            MatchElement {
                id: 1,
                condition: condition(&[], &[1]),
            },
        ];
        let tree = MatchTree::build(elements);
        assert_eq!(tree.statistics().num_atom_nodes, 1);
        assert_eq!(tree.statistics().num_leaf_nodes, 2);
    }
}
