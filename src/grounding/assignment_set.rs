//! # Assignment Sets
//!
//! A per-predicate bitset over *assignment ranks*: which single
//! `(position, object)` and joint `(position₁, object₁, position₂,
//! object₂)` assignments are consistent with a given set of ground atoms.
//! One set is built per predicate kind — the static one once at grounder
//! construction, the fluent/derived ones per evaluated state — and they
//! are what make the consistency tests in binding generation O(1).

use crate::bitset::Bitset;
use crate::pddl::ir::{IrPool, Kind, Term};

/// A single `(position, object)` assignment, or a joint pair of them.
/// Unset halves are `None`.
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub first_position: Option<u32>,
    pub first_object: Option<u32>,
    pub second_position: Option<u32>,
    pub second_object: Option<u32>,
}

impl Assignment {
    pub fn unary(position: u32, object: u32) -> Self {
        Assignment {
            first_position: Some(position),
            first_object: Some(object),
            second_position: None,
            second_object: None,
        }
    }

    pub fn pair(
        first_position: u32,
        first_object: u32,
        second_position: u32,
        second_object: u32,
    ) -> Self {
        Assignment {
            first_position: Some(first_position),
            first_object: Some(first_object),
            second_position: Some(second_position),
            second_object: Some(second_object),
        }
    }
}

/// Mixed-radix rank of an assignment within a predicate of `arity`
/// over `num_objects` objects. Unset components contribute zero.
fn assignment_rank(
    first_position: Option<u32>,
    first_object: Option<u32>,
    second_position: Option<u32>,
    second_object: Option<u32>,
    arity: usize,
    num_objects: usize,
) -> usize {
    let offset = |x: Option<u32>| x.map_or(0, |v| v as usize + 1);
    let first = 1;
    let second = first * (arity + 1);
    let third = second * (arity + 1);
    let fourth = third * (num_objects + 1);
    first * offset(first_position)
        + second * offset(second_position)
        + third * offset(first_object)
        + fourth * offset(second_object)
}

fn num_assignments(arity: usize, num_objects: usize) -> usize {
    let first = 1;
    let second = first * (arity + 1);
    let third = second * (arity + 1);
    let fourth = third * (num_objects + 1);
    first * arity + second * arity + third * num_objects + fourth * num_objects + 1
}

/// Joint unary/binary assignment bitsets for one predicate kind.
pub struct AssignmentSet {
    kind: Kind,
    num_objects: usize,
    per_predicate: Vec<Bitset>,
}

impl AssignmentSet {
    /// Build the set for `kind` from the ground atoms in `atoms`.
    pub fn build(pool: &IrPool, kind: Kind, atoms: impl Iterator<Item = u32>) -> Self {
        let num_objects = pool.objects.len();
        let per_predicate: Vec<Bitset> = pool
            .predicates
            .get(kind)
            .iter()
            .map(|p| Bitset::with_capacity(num_assignments(p.arity, num_objects)))
            .collect();

        let mut set = AssignmentSet {
            kind,
            num_objects,
            per_predicate,
        };
        set.fill(pool, atoms);
        set
    }

    fn fill(&mut self, pool: &IrPool, atoms: impl Iterator<Item = u32>) {
        for atom in atoms {
            let (predicate, objects) = pool.ground_atom_data(self.kind, atom);
            let arity = objects.len();
            let bits = &mut self.per_predicate[predicate as usize];
            for (first_position, &first_object) in objects.iter().enumerate() {
                bits.set(assignment_rank(
                    Some(first_position as u32),
                    Some(first_object),
                    None,
                    None,
                    arity,
                    self.num_objects,
                ));
                for (offset, &second_object) in objects[first_position + 1..].iter().enumerate() {
                    let second_position = first_position + 1 + offset;
                    bits.set(assignment_rank(
                        Some(first_position as u32),
                        Some(first_object),
                        Some(second_position as u32),
                        Some(second_object),
                        arity,
                        self.num_objects,
                    ));
                }
            }
        }
    }

    /// Check a literal list against a candidate (partial) assignment of
    /// parameters to objects.
    ///
    /// A positive literal fails when the induced atom-level assignment
    /// rank is absent; a negated literal fails when the rank is present
    /// *and* the assignment covers the whole literal (arity one, or
    /// arity two with both positions bound). With `relaxed`, negated
    /// literals are ignored entirely.
    pub fn literals_consistent(
        &self,
        pool: &IrPool,
        literals: &[u32],
        first: Assignment,
        second: Option<Assignment>,
        relaxed: bool,
    ) -> bool {
        for &literal_index in literals {
            let literal = pool.literals.get(self.kind).get(literal_index);
            let arity = literal.terms.len();

            let mut first_position: Option<u32> = None;
            let mut first_object: Option<u32> = None;
            let mut second_position: Option<u32> = None;
            let mut second_object: Option<u32> = None;

            for (position, term) in literal.terms.iter().enumerate() {
                let object = match term {
                    // Constants participate only for short literals,
                    // where the pair rank captures them exactly.
                    Term::Object(object) => {
                        if arity <= 2 {
                            Some(*object)
                        } else {
                            None
                        }
                    }
                    Term::Param(parameter) => lookup_parameter(*parameter, first, second),
                };
                let Some(object) = object else { continue };

                if first_position.is_none() {
                    first_position = Some(position as u32);
                    first_object = Some(object);
                } else {
                    second_position = Some(position as u32);
                    second_object = Some(object);
                    break;
                }
            }

            if first_position.is_none() {
                continue; // the assignment does not touch this literal
            }

            let rank = assignment_rank(
                first_position,
                first_object,
                second_position,
                second_object,
                arity,
                self.num_objects,
            );
            let consistent = self.per_predicate[literal.predicate as usize].get(rank);

            if !literal.negated && !consistent {
                return false;
            }
            if literal.negated && !relaxed && consistent {
                let covers_literal = arity == 1 || (arity == 2 && second_position.is_some());
                if covers_literal {
                    return false;
                }
            }
        }
        true
    }
}

fn lookup_parameter(parameter: u32, first: Assignment, second: Option<Assignment>) -> Option<u32> {
    for assignment in std::iter::once(first).chain(second) {
        if assignment.first_position == Some(parameter) {
            return assignment.first_object;
        }
        if assignment.second_position == Some(parameter) {
            return assignment.second_object;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::ir::Literal;

    fn pool_with(predicate_arity: usize, objects: usize) -> IrPool {
        let mut pool = IrPool::new();
        for i in 0..objects {
            pool.objects.intern(format!("o{i}"));
        }
        pool.add_predicate(Kind::Fluent, "p", predicate_arity);
        pool
    }

    #[test]
    fn test_unary_consistency() {
        let mut pool = pool_with(1, 3);
        let atom = pool.ground_atom(Kind::Fluent, 0, vec![1]);
        let set = AssignmentSet::build(&pool, Kind::Fluent, std::iter::once(atom));

        let literal = pool.literals.get_mut(Kind::Fluent).intern(Literal {
            predicate: 0,
            terms: vec![Term::Param(0)],
            negated: false,
        });

        assert!(set.literals_consistent(&pool, &[literal], Assignment::unary(0, 1), None, false));
        assert!(!set.literals_consistent(&pool, &[literal], Assignment::unary(0, 2), None, false));
    }

    #[test]
    fn test_binary_joint_consistency() {
        let mut pool = pool_with(2, 3);
        // p(o0, o1) holds; p(o0, o2) does not.
        let atom = pool.ground_atom(Kind::Fluent, 0, vec![0, 1]);
        let set = AssignmentSet::build(&pool, Kind::Fluent, std::iter::once(atom));

        let literal = pool.literals.get_mut(Kind::Fluent).intern(Literal {
            predicate: 0,
            terms: vec![Term::Param(0), Term::Param(1)],
            negated: false,
        });

        let good = Assignment::pair(0, 0, 1, 1);
        let bad = Assignment::pair(0, 0, 1, 2);
        assert!(set.literals_consistent(&pool, &[literal], good, None, false));
        assert!(!set.literals_consistent(&pool, &[literal], bad, None, false));
    }

    #[test]
    fn test_negated_literal_blocks_full_cover() {
        let mut pool = pool_with(1, 2);
        let atom = pool.ground_atom(Kind::Fluent, 0, vec![0]);
        let set = AssignmentSet::build(&pool, Kind::Fluent, std::iter::once(atom));

        let negated = pool.literals.get_mut(Kind::Fluent).intern(Literal {
            predicate: 0,
            terms: vec![Term::Param(0)],
            negated: true,
        });

        assert!(!set.literals_consistent(&pool, &[negated], Assignment::unary(0, 0), None, false));
        assert!(set.literals_consistent(&pool, &[negated], Assignment::unary(0, 1), None, false));
        // Relaxed checks ignore negation.
        assert!(set.literals_consistent(&pool, &[negated], Assignment::unary(0, 0), None, true));
    }
}
