//! HTTP/JSON API for repairing, checking, linearizing and scoring
//! generated graph text.
//!
//! Every endpoint is stateless apart from a semaphore that bounds how many
//! scoring batches run on the blocking pool at once.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
