//! Pkgforge - Dependency-driven build orchestrator for native C/C++ packages
//!
//! This library provides the core functionality for fetching, configuring,
//! building, and packaging native libraries from declarative TOML recipes.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (option model, build mode, packaging)
//! - [`registry`] - Local package registry and dependency resolution
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;

#[cfg(test)]
pub mod test_utils;
