//! Plans and the plan file format: one ground action per line as
//! `(name obj0 obj1 …)`, listing only the schema's user-declared
//! parameters, with no header.

use crate::grounding::Grounder;
use crate::pddl::ir::Problem;
use itertools::Itertools;

/// A solution: ground-action references in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub actions: Vec<u32>,
    pub cost: f64,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Render one action as `(name obj0 obj1 …)`, dropping synthetic
    /// parameters beyond the schema's original arity.
    pub fn render_action(problem: &Problem, grounder: &Grounder, action_id: u32) -> String {
        let action = grounder.action(action_id);
        let schema = &problem.actions[action.schema as usize];
        let objects = action.binding[..schema.original_arity]
            .iter()
            .map(|&object| problem.pool.objects.get(object).as_str());
        if schema.original_arity == 0 {
            format!("({})", schema.name)
        } else {
            format!("({} {})", schema.name, objects.format(" "))
        }
    }

    /// The plan file contents.
    pub fn render(&self, problem: &Problem, grounder: &Grounder) -> String {
        let mut out = String::new();
        for &action_id in &self.actions {
            out.push_str(&Plan::render_action(problem, grounder, action_id));
            out.push('\n');
        }
        out
    }
}
