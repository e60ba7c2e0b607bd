//! # State Store
//!
//! A state is three sequence-tree roots (fluent atoms, derived atoms,
//! numeric tuple) plus the dense index it received when first interned.
//! Interning happens by the root triple, so state equality is a
//! three-word comparison and structural sharing across states is free:
//! two successors that differ in one atom share almost the whole tree.
//!
//! The packed form is what the store keeps; hot loops work on an
//! unpacked [`DenseState`] whose bitsets are scratch buffers owned by
//! the repository.

use crate::bitset::Bitset;
use crate::error::{PlannerError, PlannerResult};
use crate::intern::SequenceTable;
use std::collections::HashMap;

/// A packed state: three sequence roots and the dense state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub fluent_root: u32,
    pub derived_root: u32,
    pub numeric_root: u32,
    pub index: u32,
}

/// A state unpacked into bitsets and a numeric tuple for tight loops.
#[derive(Debug, Clone, Default)]
pub struct DenseState {
    pub fluent: Bitset,
    pub derived: Bitset,
    pub numeric: Vec<(u32, f64)>,
}

impl DenseState {
    pub fn new() -> Self {
        DenseState::default()
    }

    pub fn clear(&mut self) {
        self.fluent.clear();
        self.derived.clear();
        self.numeric.clear();
    }

    /// Value of a ground function term, if the tuple carries it.
    pub fn numeric_value(&self, fterm: u32) -> Option<f64> {
        self.numeric
            .iter()
            .find(|(f, _)| *f == fterm)
            .map(|(_, v)| *v)
    }
}

/// Content-addressed store interning states by their root triple.
pub struct StateStore {
    sequences: SequenceTable,
    states: Vec<State>,
    index_of: HashMap<(u32, u32, u32), u32>,
    scratch: Vec<u32>,
}

impl StateStore {
    pub fn new() -> Self {
        StateStore {
            sequences: SequenceTable::new(),
            states: Vec::new(),
            index_of: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    /// Intern a dense state, returning the canonical packed state.
    ///
    /// Re-interning an already known triple returns the state with its
    /// original index.
    pub fn intern(&mut self, dense: &DenseState) -> PlannerResult<State> {
        let mut atoms = std::mem::take(&mut self.scratch);

        atoms.clear();
        atoms.extend(dense.fluent.iter_ones().map(|bit| bit as u32));
        let fluent_root = self.sequences.intern_sorted(&atoms)?;

        atoms.clear();
        atoms.extend(dense.derived.iter_ones().map(|bit| bit as u32));
        let derived_root = self.sequences.intern_sorted(&atoms)?;

        // Numeric pairs flatten to (fterm, hi, lo) words in fterm order,
        // which is canonical because the tuple has one entry per fterm.
        atoms.clear();
        let mut numeric: Vec<(u32, f64)> = dense.numeric.clone();
        numeric.sort_unstable_by_key(|(fterm, _)| *fterm);
        for (fterm, value) in numeric {
            let bits = value.to_bits();
            atoms.push(fterm);
            atoms.push((bits >> 32) as u32);
            atoms.push(bits as u32);
        }
        let numeric_root = self.sequences.intern_raw(&atoms)?;

        self.scratch = atoms;
        self.intern_roots(fluent_root, derived_root, numeric_root)
    }

    fn intern_roots(
        &mut self,
        fluent_root: u32,
        derived_root: u32,
        numeric_root: u32,
    ) -> PlannerResult<State> {
        let key = (fluent_root, derived_root, numeric_root);
        if let Some(&index) = self.index_of.get(&key) {
            return Ok(self.states[index as usize]);
        }
        let index = u32::try_from(self.states.len())
            .map_err(|_| PlannerError::Capacity("state index space"))?;
        let state = State {
            fluent_root,
            derived_root,
            numeric_root,
            index,
        };
        self.states.push(state);
        self.index_of.insert(key, index);
        Ok(state)
    }

    pub fn get(&self, index: u32) -> State {
        self.states[index as usize]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Unpack a state into `dense`, reusing its buffers.
    pub fn unpack(&self, state: State, dense: &mut DenseState) {
        dense.clear();
        for atom in self.sequences.iter(state.fluent_root) {
            dense.fluent.set(atom as usize);
        }
        for atom in self.sequences.iter(state.derived_root) {
            dense.derived.set(atom as usize);
        }
        let mut words = self.sequences.iter(state.numeric_root);
        while let Some(fterm) = words.next() {
            let hi = words.next().unwrap_or(0);
            let lo = words.next().unwrap_or(0);
            let bits = (u64::from(hi) << 32) | u64::from(lo);
            dense.numeric.push((fterm, f64::from_bits(bits)));
        }
    }

    /// Decode a state's fluent atom indices in ascending order.
    pub fn fluent_atoms(&self, state: State) -> Vec<u32> {
        self.sequences.decode(state.fluent_root)
    }

    /// Decode a state's derived atom indices in ascending order.
    pub fn derived_atoms(&self, state: State) -> Vec<u32> {
        self.sequences.decode(state.derived_root)
    }

    pub fn sequences(&self) -> &SequenceTable {
        &self.sequences
    }
}

impl Default for StateStore {
    fn default() -> Self {
        StateStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(fluent: &[usize], numeric: &[(u32, f64)]) -> DenseState {
        let mut state = DenseState::new();
        for &bit in fluent {
            state.fluent.set(bit);
        }
        state.numeric.extend_from_slice(numeric);
        state
    }

    #[test]
    fn test_interning_is_idempotent() {
        let mut store = StateStore::new();
        let a = store.intern(&dense(&[1, 5, 9], &[])).unwrap();
        let b = store.intern(&dense(&[1, 5, 9], &[])).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.num_states(), 1);

        let c = store.intern(&dense(&[1, 5], &[])).unwrap();
        assert_ne!(a.index, c.index);
        assert_eq!(store.num_states(), 2);
    }

    #[test]
    fn test_unpack_roundtrip() {
        let mut store = StateStore::new();
        let state = store
            .intern(&dense(&[0, 7, 64, 200], &[(2, 1.5), (0, -3.0)]))
            .unwrap();

        let mut out = DenseState::new();
        store.unpack(state, &mut out);
        assert_eq!(
            out.fluent.iter_ones().collect::<Vec<_>>(),
            vec![0, 7, 64, 200]
        );
        // Numeric tuple is canonicalised by fterm.
        assert_eq!(out.numeric, vec![(0, -3.0), (2, 1.5)]);
    }

    #[test]
    fn test_numeric_distinguishes_states() {
        let mut store = StateStore::new();
        let a = store.intern(&dense(&[1], &[(0, 1.0)])).unwrap();
        let b = store.intern(&dense(&[1], &[(0, 2.0)])).unwrap();
        assert_ne!(a.index, b.index);
    }

    #[test]
    fn test_reintern_returns_carried_index() {
        let mut store = StateStore::new();
        let state = store.intern(&dense(&[3, 4], &[])).unwrap();

        let mut unpacked = DenseState::new();
        store.unpack(state, &mut unpacked);
        let again = store.intern(&unpacked).unwrap();
        assert_eq!(again.index, state.index);
    }
}
