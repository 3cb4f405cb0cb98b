//! Shared utilities for the ordo dependency resolver.
//!
//! This crate provides cross-cutting concerns used by the other ordo crates:
//! the unified error type, text-file helpers for loaders, and terminal status
//! lines for the CLI.

pub mod errors;
pub mod fs;
pub mod progress;
