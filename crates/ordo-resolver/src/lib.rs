//! Dependency resolution engine: a generic combination solver using forward
//! checking with conflict-directed backjumping, the package resolver that
//! feeds it candidate groups, version-selection policy, dependency-range
//! conflicts, and install ordering of the result.
//!
//! This crate performs no I/O; callers hand it a flattened catalog.

pub mod candidate;
pub mod compare;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod solver;
