//! Parameter-combination search over per-generation entity datasets.
//!
//! `param-search` loads versioned datasets that map attribute values (moves,
//! types, colors, egg groups, ...) to the entities that have them, and
//! answers two questions: which entities satisfy a given set of constraints,
//! and which random constraint set yields a result count inside a window.
//! Searches are driven by a seedable generator whose state travels with
//! every request and response, so the same seed and dataset always produce
//! the same answer.

pub mod config;
pub mod dataset;
pub mod intersect;
pub mod protocol;
pub mod rng;
pub mod search;
pub mod types;
