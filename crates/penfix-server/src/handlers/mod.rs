//! HTTP handler modules for the penfix API.
//!
//! Handlers parse the request, delegate to the library crates and return
//! JSON. No repair or scoring logic lives here.

pub mod actions;
pub mod check;
pub mod health;
pub mod repair;
pub mod score;
