//! Core business logic module
//!
//! This module contains all business logic for pkgforge.
//! It has NO I/O operations beyond reading the trees it orchestrates -
//! network and process invocation belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`recipe`] - Recipe (pkgforge.toml) parsing and validation
//! - [`options`] - Typed option model and resolution
//! - [`deps`] - Conditional dependency requirement selection
//! - [`toolchain`] - Toolchain description and validation
//! - [`build_mode`] - Header-only vs compiled build mode selection
//! - [`pipeline`] - End-to-end build pipeline orchestration
//! - [`packaging`] - Artifact classification and package layout
//! - [`license`] - License extraction strategy chain
//! - [`metadata`] - Consumption metadata emission
//! - [`clean`] - Clean build artifacts logic

pub mod build_mode;
pub mod clean;
pub mod deps;
pub mod license;
pub mod metadata;
pub mod options;
pub mod packaging;
pub mod pipeline;
pub mod recipe;
pub mod toolchain;
