//! Error types for pkgforge
//!
//! Domain-specific error types using thiserror. Every variant carries enough
//! context (option name, dependency constraint, exit code, path) for the
//! invoker to act without inspecting internal state.

use std::path::PathBuf;
use thiserror::Error;

/// Recipe loading and validation errors
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Recipe file not found
    #[error("Recipe not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Failed to read the recipe file
    #[error("Failed to read recipe '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// TOML parse error
    #[error("Failed to parse recipe: {0}")]
    ParseError(#[from] toml::de::Error),

    /// No source type specified
    #[error("Recipe '{package}' has no source (url or path required)")]
    NoSourceType { package: String },

    /// Multiple source types specified
    #[error("Recipe '{package}' specifies multiple source types (only one allowed)")]
    MultipleSourceTypes { package: String },

    /// URL source without checksum
    #[error("Recipe '{package}' specifies a url source without sha256 checksum")]
    UrlWithoutChecksum { package: String },
}

/// Option resolution and validation errors
#[derive(Error, Debug)]
pub enum OptionError {
    /// Override names an option the recipe does not declare
    #[error("Unknown option '{name}'")]
    UnknownOption { name: String },

    /// Value outside the option's declared domain
    #[error("Option '{name}' has invalid value '{value}': must be one of {domain:?}")]
    InvalidOptionValue {
        name: String,
        value: String,
        domain: Vec<String>,
    },

    /// Value has the wrong type for the option's domain
    #[error("Option '{name}' has invalid type: expected {expected}, got '{got}'")]
    TypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// Enabled option requires a newer language standard than the toolchain configures
    #[error(
        "Option '{option}' requires C++{required} but the toolchain configures C++{configured}"
    )]
    UnsupportedToolchain {
        option: String,
        required: u32,
        configured: u32,
    },
}

/// Dependency requirement errors
#[derive(Error, Debug)]
pub enum DependencyError {
    /// Requirement cannot be satisfied by the surrounding environment
    #[error("Unresolved dependency: '{package}' ({constraint}) not found in the package registry")]
    UnresolvedDependency { package: String, constraint: String },

    /// Requirement declares an unparsable version constraint
    #[error("Invalid version constraint '{constraint}' for '{package}': {error}")]
    InvalidConstraint {
        package: String,
        constraint: String,
        error: String,
    },
}

/// Source acquisition and inspection errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network or HTTP failure while fetching the source archive
    #[error("Failed to fetch source '{url}': {error}")]
    SourceFetchError { url: String, error: String },

    /// Downloaded archive does not match its declared checksum
    #[error("Checksum mismatch for '{file}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// Archive extraction failed
    #[error("Failed to extract '{archive}': {error}")]
    ExtractFailed { archive: PathBuf, error: String },

    /// Source tree could not be inspected for the build indicator
    #[error("Failed to inspect source tree '{path}': {error}")]
    SourceInspectionError { path: PathBuf, error: String },
}

/// Toolchain invocation errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Native build toolchain returned a non-zero exit status
    #[error("Build failed for '{package}' during {phase} (exit code {exit_code}): {diagnostics}")]
    BuildFailure {
        package: String,
        phase: String,
        exit_code: i32,
        diagnostics: String,
    },

    /// Build working directory holds a partial build from a terminated run
    #[error(
        "Incomplete build state in '{build_dir}': a previous build was interrupted. \
         Re-run with --force-clean to discard it"
    )]
    IncompleteBuildState { build_dir: PathBuf },

    /// Required toolchain program is not available
    #[error("Toolchain program not found: {program}")]
    ToolchainNotFound { program: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Top-level pkgforge error type
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Recipe error
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// Option error
    #[error("Option error: {0}")]
    Option(#[from] OptionError),

    /// Dependency error
    #[error("Dependency error: {0}")]
    Dependency(#[from] DependencyError),

    /// Source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
