//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one endpoint.

pub mod actions;
pub mod check;
pub mod repair;
pub mod score;
