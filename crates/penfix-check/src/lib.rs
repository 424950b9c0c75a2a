//! Structural checks over repaired graph text and model output.
//!
//! Every check is a pure predicate over a string. A failing check is a
//! signal for the scorer, never an error.

pub mod envelope;
pub mod predicates;
pub mod report;

pub use envelope::{extract_answer, has_answer_tag, strip_think, well_formed_tag};
pub use predicates::{
    balanced, duplicate_nodes, duplicate_variables, naming_convention, unique_variables,
};
pub use report::{check_prepared, check_text, StructuralReport};
