//! Configuration and constants
//!
//! Default directory names, file names, and limits used across the crate.

pub mod defaults;
