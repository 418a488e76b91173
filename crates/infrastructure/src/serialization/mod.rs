//! Deterministic JSON for files written by Warden.
//!
//! Token records keep the field order the server sent, so repeated writes of
//! the same record produce identical bytes.

mod json;

pub use json::*;
