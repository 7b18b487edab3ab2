//! Default configuration values

/// Default recipe file name
pub const DEFAULT_RECIPE_FILE: &str = "pkgforge.toml";

/// Directory for downloaded source archives
pub const DOWNLOADS_DIR: &str = "downloads";

/// Directory for extracted source trees
pub const SOURCES_DIR: &str = "sources";

/// Suffix marking an in-progress extraction staging directory
pub const EXTRACT_STAGING_SUFFIX: &str = ".extracting";

/// Root directory for per-configuration build working directories
pub const BUILD_DIR: &str = "build";

/// Directory for the packaged output layout
pub const PACKAGE_DIR: &str = "package";

/// In-progress marker written into the build working directory
pub const BUILD_STAMP: &str = ".pkgforge-building";

/// Consumption metadata file emitted into the package directory
pub const METADATA_FILE: &str = "pkgforge-metadata.json";

/// License directory inside the package layout
pub const LICENSES_DIR: &str = "licenses";

/// License file name inside the package layout
pub const LICENSE_FILE: &str = "LICENSE";

/// Maximum number of lines the header-comment license fallback extracts
pub const MAX_HEADER_LICENSE_LINES: usize = 40;

/// Hex characters of the option-set hash used in build directory names
pub const CONFIG_HASH_LEN: usize = 12;

/// Maximum bytes of toolchain diagnostics carried in a build failure
pub const DIAGNOSTIC_TAIL_BYTES: usize = 8192;

/// HTTP timeout for source downloads (in seconds)
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// HTTP connect timeout for source downloads (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
