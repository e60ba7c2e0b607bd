//! # Novelty Table
//!
//! The pruning test behind iterated-width search: a state is novel for
//! arity `k` iff it contains some tuple of at most `k` atoms that no
//! previously tested state contained. Tuples of each size are ranked by
//! the combinatorial number system — the rank of an ascending tuple
//! `c₀ < c₁ < … < c_{s-1}` is `Σ C(cᵢ, i+1)` — which keeps each size's
//! bitset contiguous and independent of the (growing) atom universe.

use crate::bitset::Bitset;
use crate::error::{PlannerError, PlannerResult};
use itertools::Itertools;

/// Seen-tuple table for a fixed maximum tuple arity.
pub struct NoveltyTable {
    arity: usize,
    /// One bitset per tuple size `1..=arity`.
    tables: Vec<Bitset>,
    seen_empty: bool,
}

impl NoveltyTable {
    pub fn new(arity: usize) -> Self {
        assert!(arity >= 1, "novelty arity must be at least 1");
        NoveltyTable {
            arity,
            tables: vec![Bitset::new(); arity],
            seen_empty: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Forget every recorded tuple.
    pub fn reset(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
        self.seen_empty = false;
    }

    /// True iff the atom set contains a tuple of size `<= arity` not yet
    /// recorded; records all of the state's tuples either way.
    ///
    /// `atoms` must be sorted ascending.
    pub fn test_novel(&mut self, atoms: &[u32]) -> PlannerResult<bool> {
        debug_assert!(atoms.windows(2).all(|w| w[0] < w[1]));

        if atoms.is_empty() {
            let novel = !self.seen_empty;
            self.seen_empty = true;
            return Ok(novel);
        }

        let mut novel = false;
        for size in 1..=self.arity.min(atoms.len()) {
            let table = &mut self.tables[size - 1];
            for tuple in atoms.iter().copied().combinations(size) {
                let rank = tuple_rank(&tuple)?;
                if !table.get(rank) {
                    table.set(rank);
                    novel = true;
                }
            }
        }
        Ok(novel)
    }
}

/// Combinatorial-number-system rank of an ascending tuple.
fn tuple_rank(tuple: &[u32]) -> PlannerResult<usize> {
    let mut rank: u64 = 0;
    for (position, &atom) in tuple.iter().enumerate() {
        let term = binomial(u64::from(atom), position as u64 + 1)
            .ok_or(PlannerError::Capacity("novelty table size"))?;
        rank = rank
            .checked_add(term)
            .ok_or(PlannerError::Capacity("novelty table size"))?;
    }
    usize::try_from(rank).map_err(|_| PlannerError::Capacity("novelty table size"))
}

fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_small_values() {
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(4, 4), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
        assert_eq!(binomial(0, 0), Some(1));
    }

    #[test]
    fn test_rank_is_a_bijection_for_pairs() {
        // All 2-subsets of a small universe rank distinctly and densely.
        let universe = 8u32;
        let mut seen = std::collections::HashSet::new();
        for a in 0..universe {
            for b in a + 1..universe {
                let rank = tuple_rank(&[a, b]).unwrap();
                assert!(seen.insert(rank), "collision at ({a}, {b})");
            }
        }
        assert_eq!(seen.len(), 28);
        assert_eq!(seen.iter().max(), Some(&27));
    }

    #[test]
    fn test_arity_one_novelty() {
        let mut table = NoveltyTable::new(1);
        assert!(table.test_novel(&[1, 2]).unwrap());
        assert!(!table.test_novel(&[1]).unwrap());
        assert!(table.test_novel(&[3]).unwrap());
        assert!(!table.test_novel(&[1, 2, 3]).unwrap());
    }

    #[test]
    fn test_arity_two_catches_new_pairs() {
        let mut table = NoveltyTable::new(2);
        assert!(table.test_novel(&[1, 2]).unwrap());
        assert!(table.test_novel(&[2, 3]).unwrap());
        // {1,3} is a new pair even though 1 and 3 are both known atoms.
        assert!(table.test_novel(&[1, 3]).unwrap());
        assert!(!table.test_novel(&[1, 2]).unwrap());
    }

    #[test]
    fn test_reset_forgets() {
        let mut table = NoveltyTable::new(1);
        assert!(table.test_novel(&[4]).unwrap());
        table.reset();
        assert!(table.test_novel(&[4]).unwrap());
    }

    #[test]
    fn test_empty_state_is_novel_once() {
        let mut table = NoveltyTable::new(2);
        assert!(table.test_novel(&[]).unwrap());
        assert!(!table.test_novel(&[]).unwrap());
    }
}
