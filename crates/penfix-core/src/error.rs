//! Codec error and warning types for penfix-core.
//!
//! [`DecodeError`] means the text cannot be read as a graph at all; callers
//! treat it as "give up on this sample". [`DecodeWarning`] is attached to a
//! successful decode when the codec had to ignore or tolerate something.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding PENMAN text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DecodeError {
    /// The input holds no tokens at all.
    #[error("empty input")]
    EmptyInput,

    /// A double-quoted string was opened but never closed.
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A bare `:` with no role name.
    #[error("empty role at offset {offset}")]
    EmptyRole { offset: usize },

    /// A token appeared where the grammar expected something else.
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    /// Input ended in the middle of a node.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Nodes nested deeper than the parser allows.
    #[error("nesting deeper than {max} levels at offset {offset}")]
    TooDeep { max: usize, offset: usize },

    /// A role with no value after it.
    #[error("role {role} at offset {offset} has no value")]
    MissingRoleValue { role: String, offset: usize },
}

/// Non-fatal diagnostics emitted by a successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DecodeWarning {
    /// A node header without a `/ concept` part.
    #[error("node {variable} has no concept")]
    MissingConcept { variable: String },

    /// A variable bound to a concept more than once.
    #[error("variable {variable} is defined more than once")]
    DuplicateVariable { variable: String },

    /// Tokens after the closing paren of the root node were skipped.
    #[error("ignoring trailing input at offset {offset}")]
    IgnoredTrailingInput { offset: usize },
}
