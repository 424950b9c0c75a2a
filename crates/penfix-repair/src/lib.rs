//! Text repair for generator-produced PENMAN graphs.
//!
//! Every transform is a total function `&str -> String`: it terminates on any
//! input, including the empty string, and never fails. Transforms are
//! composed into a [`RepairPipeline`], which reruns its pass list until a
//! round leaves the text unchanged.
//!
//! Default transforms, in the order later ones rely on:
//!
//! 1. [`spacing::normalize_role_spacing`]
//! 2. [`concepts::join_multiword_concepts`]
//! 3. [`concepts::collapse_duplicate_headers`] (fixpoint)
//! 4. [`concepts::strip_orphan_slashes`]
//! 5. [`parens::balance_parens`]
//! 6. [`roles::remove_empty_roles`]
//! 7. [`spacing::collapse_whitespace`]
//!
//! Opt-in transforms: [`reconcile::reconcile_references`],
//! [`roles::dedup_roles`], [`prune::prune_leaf_wrappers`].

pub mod concepts;
pub mod fixpoint;
pub mod parens;
pub mod pipeline;
pub mod prune;
pub mod reconcile;
pub mod roles;
pub mod spacing;

pub use concepts::{collapse_duplicate_headers, join_multiword_concepts, strip_orphan_slashes};
pub use fixpoint::fixpoint;
pub use parens::{balance_parens, trim_stray_closing_lines};
pub use pipeline::{Pass, Preset, RepairOptions, RepairPipeline, RepairTrace};
pub use prune::prune_leaf_wrappers;
pub use reconcile::{reconcile_references, ReentrancyPolicy};
pub use roles::{dedup_roles, remove_empty_roles, RoleFilter};
pub use spacing::{collapse_whitespace, normalize_role_spacing};

/// The seven default transforms in order, run once each.
pub fn sanitize(text: &str) -> String {
    RepairPipeline::sanitize().run(text)
}
