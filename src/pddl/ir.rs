//! Canonical planning task representation.
//!
//! Every entity lives in a flat array inside the [`IrPool`] and is
//! addressed by a dense `u32` index; cross-references are indices, never
//! owning pointers, so the cyclic domain/action/predicate references of
//! PDDL flatten into plain data. Interning gives hash-consing: two
//! structurally equal atoms receive the same index, and index equality is
//! structural equality from then on.
//!
//! Predicates come in three kinds with separate index spaces:
//! static (extension fixed by the initial state), fluent (changed by
//! action effects), and derived (defined by axioms). Ground atoms are
//! likewise interned per kind, which is what lets states be bitsets over
//! a single dense fluent (or derived) atom universe.

use std::collections::HashMap;
use std::hash::Hash;

/// Predicate kind, fixed at normalisation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Fluent,
    Derived,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Static, Kind::Fluent, Kind::Derived];
}

/// One value per predicate kind.
#[derive(Debug, Clone, Default)]
pub struct PerKind<T>([T; 3]);

impl<T> PerKind<T> {
    pub fn get(&self, kind: Kind) -> &T {
        &self.0[kind as usize]
    }

    pub fn get_mut(&mut self, kind: Kind) -> &mut T {
        &mut self.0[kind as usize]
    }
}

/// Append-only interning table assigning dense `u32` indices.
#[derive(Debug, Clone)]
pub struct Interner<K: Eq + Hash + Clone> {
    items: Vec<K>,
    index: HashMap<K, u32>,
}

impl<K: Eq + Hash + Clone> Default for Interner<K> {
    fn default() -> Self {
        Interner {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Interner<K> {
    pub fn intern(&mut self, key: K) -> u32 {
        if let Some(&index) = self.index.get(&key) {
            return index;
        }
        let index = self.items.len() as u32;
        self.items.push(key.clone());
        self.index.insert(key, index);
        index
    }

    /// Index of `key` if it has been interned, without creating it.
    pub fn find(&self, key: &K) -> Option<u32> {
        self.index.get(key).copied()
    }

    pub fn get(&self, index: u32) -> &K {
        &self.items[index as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.items.iter()
    }
}

/// A term is either a schema parameter position or a concrete object.
///
/// Parameter positions are the only binding key: normalisation encodes
/// each variable's zero-based position inside its enclosing schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Param(u32),
    Object(u32),
}

/// A predicate symbol within one kind's index space.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
}

/// Function symbol kind: static (fixed by init), fluent (assignable), or
/// auxiliary (the `total-cost` accumulator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Static,
    Fluent,
    Auxiliary,
}

#[derive(Debug, Clone)]
pub struct FunctionSkeleton {
    pub name: String,
    pub arity: usize,
    pub kind: FunctionKind,
}

/// A lifted literal: predicate, term tuple, negation flag. Interned per
/// kind so the grounder can cache per-literal grounding tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub predicate: u32,
    pub terms: Vec<Term>,
    pub negated: bool,
}

/// A ground literal over an interned ground atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroundLiteral {
    pub atom: u32,
    pub negated: bool,
}

/// Numeric term: a constant or a function application.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericExpr {
    Constant(f64),
    Apply(u32, Vec<Term>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl CompareOp {
    pub fn eval(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => (lhs - rhs).abs() < f64::EPSILON,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Gt => lhs > rhs,
        }
    }
}

/// Lifted numeric constraint in a condition body.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericConstraint {
    pub op: CompareOp,
    pub lhs: NumericExpr,
    pub rhs: NumericExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOp {
    Assign,
    Increase,
    Decrease,
}

/// Lifted numeric effect `(op (f terms) amount)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericEffect {
    pub op: NumericOp,
    pub function: u32,
    pub terms: Vec<Term>,
    pub amount: NumericExpr,
}

/// Conjunctive condition over `arity` parameters: per-kind literal lists
/// plus numeric constraints. Literals are indices into the pool's
/// per-kind literal interners.
#[derive(Debug, Clone, Default)]
pub struct ConjunctiveCondition {
    pub arity: usize,
    pub statics: Vec<u32>,
    pub fluents: Vec<u32>,
    pub deriveds: Vec<u32>,
    pub numerics: Vec<NumericConstraint>,
}

impl ConjunctiveCondition {
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty()
            && self.fluents.is_empty()
            && self.deriveds.is_empty()
            && self.numerics.is_empty()
    }
}

/// Conjunctive effect: fluent literals (negated = delete) plus numeric
/// effects.
#[derive(Debug, Clone, Default)]
pub struct ConjunctiveEffect {
    pub fluents: Vec<u32>,
    pub numerics: Vec<NumericEffect>,
}

/// A conditional effect with `arity` extra quantified parameters beyond
/// the enclosing schema's. Term positions inside it range over
/// `0..schema_arity + arity`.
#[derive(Debug, Clone)]
pub struct ConditionalEffect {
    pub arity: usize,
    pub condition: ConjunctiveCondition,
    pub effect: ConjunctiveEffect,
}

/// A lifted action schema.
#[derive(Debug, Clone)]
pub struct ActionSchema {
    pub index: u32,
    pub name: String,
    pub parameters: Vec<String>,
    /// Number of user-declared parameters; anything beyond was introduced
    /// by normalisation and is omitted from plan output.
    pub original_arity: usize,
    pub precondition: ConjunctiveCondition,
    pub effect: ConjunctiveEffect,
    pub conditional_effects: Vec<ConditionalEffect>,
}

impl ActionSchema {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A lifted axiom schema: conjunctive body, positive derived head.
#[derive(Debug, Clone)]
pub struct AxiomSchema {
    pub index: u32,
    pub parameters: Vec<String>,
    pub body: ConjunctiveCondition,
    /// Derived literal index; always positive.
    pub head: u32,
}

/// Ground goal condition, per predicate kind.
#[derive(Debug, Clone, Default)]
pub struct GoalCondition {
    pub statics: Vec<GroundLiteral>,
    pub fluents: Vec<GroundLiteral>,
    pub deriveds: Vec<GroundLiteral>,
}

impl GoalCondition {
    pub fn num_literals(&self) -> usize {
        self.statics.len() + self.fluents.len() + self.deriveds.len()
    }
}

/// The interning pool behind a planning task.
///
/// Shared by the grounder, the binding generator, and the state
/// repository; append-only during search.
#[derive(Debug, Clone, Default)]
pub struct IrPool {
    pub objects: Interner<String>,
    pub predicates: PerKind<Vec<Predicate>>,
    predicate_index: PerKind<HashMap<String, u32>>,
    pub functions: Vec<FunctionSkeleton>,
    function_index: HashMap<String, u32>,
    pub literals: PerKind<Interner<Literal>>,
    ground_atoms: PerKind<Interner<(u32, Vec<u32>)>>,
    /// Ground function terms `(function, objects)`.
    pub fterms: Interner<(u32, Vec<u32>)>,
}

impl IrPool {
    pub fn new() -> Self {
        IrPool::default()
    }

    pub fn add_predicate(&mut self, kind: Kind, name: &str, arity: usize) -> u32 {
        if let Some(&index) = self.predicate_index.get(kind).get(name) {
            return index;
        }
        let index = self.predicates.get(kind).len() as u32;
        self.predicates.get_mut(kind).push(Predicate {
            name: name.to_string(),
            arity,
        });
        self.predicate_index
            .get_mut(kind)
            .insert(name.to_string(), index);
        index
    }

    /// Look up a predicate name, returning its kind and index.
    pub fn find_predicate(&self, name: &str) -> Option<(Kind, u32)> {
        Kind::ALL
            .into_iter()
            .find_map(|kind| self.predicate_index.get(kind).get(name).map(|&i| (kind, i)))
    }

    pub fn predicate(&self, kind: Kind, index: u32) -> &Predicate {
        &self.predicates.get(kind)[index as usize]
    }

    pub fn add_function(&mut self, name: &str, arity: usize, kind: FunctionKind) -> u32 {
        if let Some(&index) = self.function_index.get(name) {
            return index;
        }
        let index = self.functions.len() as u32;
        self.functions.push(FunctionSkeleton {
            name: name.to_string(),
            arity,
            kind,
        });
        self.function_index.insert(name.to_string(), index);
        index
    }

    pub fn find_function(&self, name: &str) -> Option<u32> {
        self.function_index.get(name).copied()
    }

    /// Intern a ground atom, assigning a dense per-kind index.
    pub fn ground_atom(&mut self, kind: Kind, predicate: u32, objects: Vec<u32>) -> u32 {
        self.ground_atoms.get_mut(kind).intern((predicate, objects))
    }

    /// Non-creating ground atom lookup. An atom that was never interned
    /// cannot be a member of any state.
    pub fn find_ground_atom(&self, kind: Kind, predicate: u32, objects: &[u32]) -> Option<u32> {
        // The interner key is owned; probe with a scratch pair.
        self.ground_atoms
            .get(kind)
            .find(&(predicate, objects.to_vec()))
    }

    pub fn ground_atom_data(&self, kind: Kind, index: u32) -> (u32, &[u32]) {
        let (predicate, objects) = self.ground_atoms.get(kind).get(index);
        (*predicate, objects)
    }

    pub fn num_ground_atoms(&self, kind: Kind) -> usize {
        self.ground_atoms.get(kind).len()
    }

    /// Render a ground atom as `(name obj ...)`.
    pub fn ground_atom_name(&self, kind: Kind, index: u32) -> String {
        let (predicate, objects) = self.ground_atom_data(kind, index);
        let mut out = format!("({}", self.predicate(kind, predicate).name);
        for &object in objects {
            out.push(' ');
            out.push_str(self.objects.get(object));
        }
        out.push(')');
        out
    }
}

/// A fully normalised, lowered planning task.
#[derive(Debug, Clone)]
pub struct Problem {
    pub domain_name: String,
    pub problem_name: String,
    pub pool: IrPool,
    pub actions: Vec<ActionSchema>,
    pub axioms: Vec<AxiomSchema>,
    pub initial_static_atoms: Vec<u32>,
    pub initial_fluent_atoms: Vec<u32>,
    /// Initial numeric assignments `(fterm, value)` for fluent functions;
    /// these form the state's numeric tuple.
    pub initial_values: Vec<(u32, f64)>,
    /// Values of static functions, fixed for the whole search.
    pub static_values: Vec<(u32, f64)>,
    pub goal: GoalCondition,
    /// True iff the problem declares `(:metric minimize (total-cost))`.
    pub metric_total_cost: bool,
    /// The `total-cost` auxiliary function, if declared.
    pub total_cost_function: Option<u32>,
}

impl Problem {
    /// Substitute a binding into a term tuple.
    pub fn ground_terms(terms: &[Term], binding: &[u32]) -> Vec<u32> {
        terms
            .iter()
            .map(|term| match term {
                Term::Param(position) => binding[*position as usize],
                Term::Object(object) => *object,
            })
            .collect()
    }
}
