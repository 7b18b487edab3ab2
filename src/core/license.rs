//! License extraction
//!
//! Extracts the package license text through an ordered chain of strategies;
//! the first strategy producing a result wins. The final fallback reads the
//! leading comment block of the primary header and legitimately yields empty
//! content when the header does not open with a comment.

use std::path::Path;

use crate::config::defaults;
use crate::error::FilesystemError;

/// Ordered license extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseStrategy {
    /// Copy a top-level LICENSE file verbatim
    TopLevelFile,
    /// Extract the leading comment block of the primary header, capped at
    /// [`defaults::MAX_HEADER_LICENSE_LINES`] lines
    HeaderComment,
}

/// Strategies in preference order
pub const STRATEGY_CHAIN: &[LicenseStrategy] =
    &[LicenseStrategy::TopLevelFile, LicenseStrategy::HeaderComment];

impl LicenseStrategy {
    /// Run this strategy against the source tree
    ///
    /// Returns `Ok(None)` when the strategy does not apply (its input file
    /// is absent); read failures on a present file are reported.
    pub fn extract(
        self,
        source_root: &Path,
        primary_header: Option<&str>,
    ) -> Result<Option<String>, FilesystemError> {
        match self {
            Self::TopLevelFile => {
                let path = source_root.join(defaults::LICENSE_FILE);
                if !path.is_file() {
                    return Ok(None);
                }
                let text =
                    std::fs::read_to_string(&path).map_err(|e| FilesystemError::ReadFile {
                        path,
                        error: e.to_string(),
                    })?;
                Ok(Some(text))
            }
            Self::HeaderComment => {
                let Some(header) = primary_header else {
                    return Ok(None);
                };
                let path = source_root.join(header);
                if !path.is_file() {
                    return Ok(None);
                }
                let content =
                    std::fs::read_to_string(&path).map_err(|e| FilesystemError::ReadFile {
                        path,
                        error: e.to_string(),
                    })?;
                Ok(Some(leading_comment_block(&content)))
            }
        }
    }
}

/// Extract the license text for a source tree
///
/// Runs [`STRATEGY_CHAIN`] in order; returns an empty string when no
/// strategy applies.
pub fn extract_license(
    source_root: &Path,
    primary_header: Option<&str>,
) -> Result<String, FilesystemError> {
    for strategy in STRATEGY_CHAIN {
        if let Some(text) = strategy.extract(source_root, primary_header)? {
            return Ok(text);
        }
    }
    Ok(String::new())
}

/// Leading comment block of a source file, capped at
/// [`defaults::MAX_HEADER_LICENSE_LINES`] lines
///
/// Handles both `/* ... */` blocks and runs of `//` lines. A file that does
/// not open with a comment yields an empty string.
fn leading_comment_block(content: &str) -> String {
    let mut lines = content.lines().peekable();
    let Some(first) = lines.peek() else {
        return String::new();
    };

    let mut collected = Vec::new();
    if first.trim_start().starts_with("/*") {
        for line in lines.take(defaults::MAX_HEADER_LICENSE_LINES) {
            collected.push(line);
            if line.contains("*/") {
                break;
            }
        }
    } else if first.trim_start().starts_with("//") {
        for line in lines.take(defaults::MAX_HEADER_LICENSE_LINES) {
            if !line.trim_start().starts_with("//") {
                break;
            }
            collected.push(line);
        }
    }

    collected.join("\n")
}
