//! Transition-action linearization of a graph.
//!
//! The sequence is built for a left-to-right transition-based generator:
//!
//! 1. For each defined variable in declaration order, emit
//!    `SHIFT(v / concept)` followed by one `ARC(role, v, child)` per edge
//!    whose parent is `v`, found by scanning the full edge list in textual
//!    order.
//! 2. Emit `REDUCE(v)` for every defined variable in reverse declaration
//!    order.
//!
//! A graph with `n` variables and `e` relations yields exactly
//! `2n + e` actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::graph::AmrGraph;
use crate::parser::decode;

/// One transition action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Introduce a node.
    Shift {
        variable: String,
        concept: Option<String>,
    },
    /// Attach an edge from an introduced node.
    Arc {
        role: String,
        parent: String,
        child: String,
    },
    /// Close a node.
    Reduce { variable: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift {
                variable,
                concept: Some(concept),
            } => write!(f, "SHIFT({} / {})", variable, concept),
            Action::Shift {
                variable,
                concept: None,
            } => write!(f, "SHIFT({})", variable),
            Action::Arc {
                role,
                parent,
                child,
            } => write!(f, "ARC({}, {}, {})", role, parent, child),
            Action::Reduce { variable } => write!(f, "REDUCE({})", variable),
        }
    }
}

/// Linearizes `graph` into SHIFT / ARC / REDUCE actions.
pub fn encode_actions(graph: &AmrGraph) -> Vec<Action> {
    let order: Vec<&str> = graph.variables().collect();
    let edges = graph.edges();
    let mut actions = Vec::with_capacity(2 * order.len() + edges.len());

    for &variable in &order {
        actions.push(Action::Shift {
            variable: variable.to_string(),
            concept: graph.concept(variable).map(str::to_string),
        });
        // Full scan per node: reentrant edges are emitted under their parent.
        for edge in edges.iter().filter(|e| e.source == variable) {
            actions.push(Action::Arc {
                role: edge.role.clone(),
                parent: edge.source.clone(),
                child: edge.target.clone(),
            });
        }
    }

    for &variable in order.iter().rev() {
        actions.push(Action::Reduce {
            variable: variable.to_string(),
        });
    }

    actions
}

/// Decodes `text` and linearizes the result.
pub fn actions_from_text(text: &str) -> Result<Vec<Action>, DecodeError> {
    let decoded = decode(text)?;
    Ok(encode_actions(&AmrGraph::from_tree(&decoded.tree)))
}
