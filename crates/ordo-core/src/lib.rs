//! Core data types for the ordo dependency resolver.
//!
//! This crate defines the values the resolver consumes and produces: package
//! identities, versions and version ranges, dependency behaviors, the flat
//! package catalog, and configuration.
//!
//! Loaders for catalog and config files live here so that the resolver crate
//! itself stays free of file I/O.

pub mod behavior;
pub mod catalog;
pub mod config;
pub mod identity;
pub mod version;
