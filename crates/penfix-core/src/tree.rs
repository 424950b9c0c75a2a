//! Parsed tree form of a PENMAN graph.
//!
//! The tree keeps the author's layout: branch order, which occurrence of a
//! variable carries the definition, and which values were quoted. The
//! [`crate::graph::AmrGraph`] view is derived from it.

use serde::{Deserialize, Serialize};

/// A parsed graph: the root node and everything nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub root: Node,
}

/// A parenthesized node `(variable / concept :role target ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub variable: String,
    /// `None` when the header had no `/ concept` part. A quoted concept
    /// stays an [`Atom::Str`] so it is re-quoted on encode.
    pub concept: Option<Atom>,
    pub branches: Vec<Branch>,
}

/// One `:role target` pair under a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Role with its leading colon.
    pub role: String,
    pub target: Target,
}

/// What a role points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// A nested node definition.
    Node(Box<Node>),
    /// A bare symbol or quoted string. Whether a symbol is a reference to
    /// another variable is only known once the whole tree is read.
    Atom(Atom),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    Symbol(String),
    Str(String),
}

impl Atom {
    /// The raw value without quotes.
    pub fn value(&self) -> &str {
        match self {
            Atom::Symbol(s) | Atom::Str(s) => s,
        }
    }
}

impl Node {
    /// The concept without quotes.
    pub fn concept_value(&self) -> Option<&str> {
        self.concept.as_ref().map(Atom::value)
    }

    /// Visits this node and every nested node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for branch in &self.branches {
            if let Target::Node(child) = &branch.target {
                child.walk(visit);
            }
        }
    }
}

impl Tree {
    /// Every node definition in pre-order (textual order).
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        self.root.walk(&mut |n| nodes.push(n));
        nodes
    }
}
