//! AmrGraph: the petgraph-backed view of a decoded tree.
//!
//! Every defined variable becomes one node (an [`Instance`]) in a
//! `StableGraph`; every role whose target is a defined variable becomes a
//! directed edge weighted by its role. Roles with constant targets are kept
//! aside as [`Attribute`]s. As in PENMAN, a bare symbol is a reference only
//! when some node in the same graph defines it.
//!
//! Edge indices are assigned in textual pre-order, so iterating
//! `edge_indices()` yields edges in the order the author wrote them.

use std::collections::HashSet;

use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::tree::{Atom, Node, Target, Tree};

/// A variable and the concept bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub variable: String,
    pub concept: Option<String>,
}

/// A role whose value is a constant rather than a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub source: String,
    pub role: String,
    pub value: String,
}

/// A variable-to-variable relation, resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub role: String,
    pub target: String,
}

/// One triple of the flat graph form used for overlap scoring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Triple {
    /// `(variable, instance, concept)`.
    Instance { variable: String, concept: String },
    /// `(variable, role, constant)`; the root yields `(top, TOP, concept)`.
    Attribute {
        source: String,
        role: String,
        value: String,
    },
    /// `(variable, role, variable)`.
    Relation {
        source: String,
        role: String,
        target: String,
    },
}

/// Role name used for the synthetic root triple.
pub const TOP_ROLE: &str = "TOP";

/// Graph view of a decoded PENMAN tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmrGraph {
    graph: StableGraph<Instance, String, Directed, u32>,
    /// Defined variables in declaration order.
    variables: IndexMap<String, NodeIndex<u32>>,
    attributes: Vec<Attribute>,
    top: String,
}

impl AmrGraph {
    /// Builds the graph view of `tree`.
    ///
    /// A variable defined more than once keeps the position of its first
    /// definition and the concept of its last one.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut graph = StableGraph::<Instance, String, Directed, u32>::new();
        let mut variables: IndexMap<String, NodeIndex<u32>> = IndexMap::new();

        // Pass 1: instances, so references to later definitions resolve.
        for node in tree.nodes() {
            match variables.get(&node.variable) {
                Some(&idx) => {
                    if let Some(concept) = node.concept_value() {
                        graph[idx].concept = Some(concept.to_string());
                    }
                }
                None => {
                    let idx = graph.add_node(Instance {
                        variable: node.variable.clone(),
                        concept: node.concept_value().map(str::to_string),
                    });
                    variables.insert(node.variable.clone(), idx);
                }
            }
        }

        // Pass 2: relations and attributes in textual order.
        let mut attributes = Vec::new();
        add_branches(&tree.root, &mut graph, &variables, &mut attributes);

        AmrGraph {
            graph,
            variables,
            attributes,
            top: tree.root.variable.clone(),
        }
    }

    /// The root variable.
    pub fn top(&self) -> &str {
        &self.top
    }

    /// Returns a read-only reference to the underlying petgraph.
    pub fn graph(&self) -> &StableGraph<Instance, String, Directed, u32> {
        &self.graph
    }

    /// Defined variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Number of defined variables.
    pub fn node_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of variable-to-variable edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node index of `variable`, if it is defined.
    pub fn index_of(&self, variable: &str) -> Option<NodeIndex<u32>> {
        self.variables.get(variable).copied()
    }

    /// Concept bound to `variable`.
    pub fn concept(&self, variable: &str) -> Option<&str> {
        self.index_of(variable)
            .and_then(|idx| self.graph[idx].concept.as_deref())
    }

    /// Instances in declaration order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.variables.values().map(move |&idx| &self.graph[idx])
    }

    /// All relations in textual order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.resolve_edge(e))
            .collect()
    }

    /// Outgoing relations of `variable` in textual order.
    pub fn edges_from(&self, variable: &str) -> Vec<Edge> {
        let Some(idx) = self.index_of(variable) else {
            return Vec::new();
        };
        let mut out: Vec<EdgeIndex<u32>> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.id())
            .collect();
        out.sort();
        out.into_iter().filter_map(|e| self.resolve_edge(e)).collect()
    }

    fn resolve_edge(&self, e: EdgeIndex<u32>) -> Option<Edge> {
        let (source, target) = self.graph.edge_endpoints(e)?;
        Some(Edge {
            source: self.graph[source].variable.clone(),
            role: self.graph[e].clone(),
            target: self.graph[target].variable.clone(),
        })
    }

    /// Constant-valued roles in textual order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Number of nodes with more than one incoming relation.
    pub fn reentrancies(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .count()
                    > 1
            })
            .count()
    }

    /// Flat triple form: instances, then the `TOP` attribute and the
    /// remaining attributes, then relations.
    pub fn triples(&self) -> Vec<Triple> {
        let mut triples = Vec::new();
        for instance in self.instances() {
            if let Some(concept) = &instance.concept {
                triples.push(Triple::Instance {
                    variable: instance.variable.clone(),
                    concept: concept.clone(),
                });
            }
        }
        if let Some(concept) = self.concept(&self.top) {
            triples.push(Triple::Attribute {
                source: self.top.clone(),
                role: TOP_ROLE.to_string(),
                value: concept.to_string(),
            });
        }
        for attr in &self.attributes {
            triples.push(Triple::Attribute {
                source: attr.source.clone(),
                role: attr.role.clone(),
                value: attr.value.clone(),
            });
        }
        for edge in self.edges() {
            triples.push(Triple::Relation {
                source: edge.source,
                role: edge.role,
                target: edge.target,
            });
        }
        triples
    }

    /// Variables that are the target of at least one relation, nested
    /// definitions included.
    pub fn referenced_variables(&self) -> HashSet<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .count()
                    > 0
            })
            .map(|idx| self.graph[idx].variable.as_str())
            .collect()
    }
}

fn add_branches(
    node: &Node,
    graph: &mut StableGraph<Instance, String, Directed, u32>,
    variables: &IndexMap<String, NodeIndex<u32>>,
    attributes: &mut Vec<Attribute>,
) {
    let Some(&source) = variables.get(&node.variable) else {
        return;
    };
    for branch in &node.branches {
        match &branch.target {
            Target::Node(child) => {
                if let Some(&target) = variables.get(&child.variable) {
                    graph.add_edge(source, target, branch.role.clone());
                }
                add_branches(child, graph, variables, attributes);
            }
            Target::Atom(Atom::Symbol(symbol)) if variables.contains_key(symbol) => {
                let target = variables[symbol];
                graph.add_edge(source, target, branch.role.clone());
            }
            Target::Atom(atom) => attributes.push(Attribute {
                source: node.variable.clone(),
                role: branch.role.clone(),
                value: atom.value().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode;

    fn graph(text: &str) -> AmrGraph {
        AmrGraph::from_tree(&decode(text).unwrap().tree)
    }

    #[test]
    fn variables_follow_declaration_order() {
        let g = graph("(a / alpha :ARG0 (b / beta :mod (c / gamma)) :ARG1 (d / delta))");
        let vars: Vec<&str> = g.variables().collect();
        assert_eq!(vars, vec!["a", "b", "c", "d"]);
        assert_eq!(g.top(), "a");
        assert_eq!(g.concept("c"), Some("gamma"));
    }

    #[test]
    fn edges_follow_textual_order() {
        let g = graph("(a / alpha :ARG0 (b / beta :mod (c / gamma)) :ARG1 (d / delta))");
        let edges: Vec<(String, String, String)> = g
            .edges()
            .into_iter()
            .map(|e| (e.source, e.role, e.target))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("a".into(), ":ARG0".into(), "b".into()),
                ("b".into(), ":mod".into(), "c".into()),
                ("a".into(), ":ARG1".into(), "d".into()),
            ]
        );
    }

    #[test]
    fn reference_to_defined_variable_is_an_edge() {
        let g = graph("(w / want :ARG0 (b / boy) :ARG1 (g / go :ARG0 b))");
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.reentrancies(), 1);
        assert!(g.attributes().is_empty());
        assert!(g.referenced_variables().contains("b"));
    }

    #[test]
    fn reference_to_later_definition_resolves() {
        let g = graph("(a / alpha :ARG0 b :ARG1 (b / beta))");
        assert_eq!(g.edge_count(), 2);
        let vars: Vec<&str> = g.variables().collect();
        assert_eq!(vars, vec!["a", "b"]);
    }

    #[test]
    fn undefined_symbol_is_an_attribute() {
        let g = graph("(a / anh :quant 1 :ARG0 zz :name \"Nam\")");
        assert_eq!(g.edge_count(), 0);
        let values: Vec<&str> = g.attributes().iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["1", "zz", "Nam"]);
    }

    #[test]
    fn duplicate_definition_keeps_first_position_last_concept() {
        let g = graph("(a / alpha :mod (b / beta) :ARG0 (a / again))");
        let vars: Vec<&str> = g.variables().collect();
        assert_eq!(vars, vec!["a", "b"]);
        assert_eq!(g.concept("a"), Some("again"));
        // the nested redefinition points back at the root
        assert_eq!(g.edges_from("a").len(), 2);
    }

    #[test]
    fn triples_include_top() {
        let g = graph("(a / alpha :quant 2 :mod (b / beta))");
        let triples = g.triples();
        assert_eq!(triples.len(), 5);
        assert!(triples.contains(&Triple::Attribute {
            source: "a".into(),
            role: TOP_ROLE.into(),
            value: "alpha".into(),
        }));
        assert!(triples.contains(&Triple::Relation {
            source: "a".into(),
            role: ":mod".into(),
            target: "b".into(),
        }));
    }

    #[test]
    fn edges_from_unknown_variable_is_empty() {
        let g = graph("(a / alpha)");
        assert!(g.edges_from("zz").is_empty());
    }
}
