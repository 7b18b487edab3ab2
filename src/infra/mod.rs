//! Infrastructure layer
//!
//! Side-effectful operations: HTTP downloads, archive extraction,
//! filesystem manipulation, and toolchain process invocation.

pub mod cmake;
pub mod download;
pub mod extract;
pub mod filesystem;
pub mod source;
