//! Serializes a [`Tree`] back to PENMAN text.
//!
//! [`encode`] produces the indented multi-line layout (four spaces per
//! nesting level, one branch per line). [`encode_one_line`] produces the
//! single-line form written into corpora and fed back to the model.

use crate::tree::{Atom, Node, Target, Tree};

const INDENT: &str = "    ";

/// Indented multi-line serialization.
pub fn encode(tree: &Tree) -> String {
    let mut out = String::new();
    write_node(&tree.root, 1, Some(INDENT), &mut out);
    out
}

/// Single-line serialization with single spaces between tokens.
pub fn encode_one_line(tree: &Tree) -> String {
    let mut out = String::new();
    write_node(&tree.root, 1, None, &mut out);
    out
}

/// Flattens any PENMAN text to one line: lines are trimmed, joined with a
/// space, and whitespace runs collapse to one space.
pub fn to_one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn write_node(node: &Node, depth: usize, indent: Option<&str>, out: &mut String) {
    out.push('(');
    out.push_str(&node.variable);
    if let Some(concept) = &node.concept {
        out.push_str(" / ");
        write_atom(concept, out);
    }
    for branch in &node.branches {
        match indent {
            Some(unit) => {
                out.push('\n');
                for _ in 0..depth {
                    out.push_str(unit);
                }
            }
            None => out.push(' '),
        }
        out.push_str(&branch.role);
        out.push(' ');
        match &branch.target {
            Target::Node(child) => write_node(child, depth + 1, indent, out),
            Target::Atom(atom) => write_atom(atom, out),
        }
    }
    out.push(')');
}

fn write_atom(atom: &Atom, out: &mut String) {
    match atom {
        Atom::Symbol(s) => out.push_str(s),
        Atom::Str(s) => {
            out.push('"');
            for ch in s.chars() {
                if ch == '"' || ch == '\\' {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push('"');
        }
    }
}
