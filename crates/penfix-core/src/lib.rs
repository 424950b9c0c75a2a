//! Graph data model, PENMAN codec and action encoder for penfix.
//!
//! - [`lexer`] / [`parser`]: text -> [`tree::Tree`] with non-fatal warnings
//! - [`encode`]: [`tree::Tree`] -> text, multi-line or single-line
//! - [`graph`]: [`graph::AmrGraph`], the petgraph-backed view used for
//!   traversal and triple extraction
//! - [`actions`]: SHIFT / ARC / REDUCE linearization
//! - [`surface`]: lexical scanning of raw, possibly malformed text
//!
//! The codec is a "no-op" model: roles are kept exactly as written, no
//! inversion (`:ARG0-of`) or canonicalization is ever applied.

pub mod actions;
pub mod encode;
pub mod error;
pub mod graph;
pub mod lexer;
pub mod parser;
pub mod surface;
pub mod tree;

// Re-export commonly used types
pub use actions::{actions_from_text, encode_actions, Action};
pub use encode::{encode, encode_one_line, to_one_line};
pub use error::{DecodeError, DecodeWarning};
pub use graph::{AmrGraph, Attribute, Edge, Triple};
pub use parser::{decode, Decoded};
pub use tree::{Atom, Branch, Node, Target, Tree};
