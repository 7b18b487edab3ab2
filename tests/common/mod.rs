//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Set up a header-only source tree and write a recipe pointing at it.
/// Returns the source tree path.
#[allow(dead_code)]
pub fn setup_header_only_project(project: &TestProject) -> PathBuf {
    let source = project.path().join("upstream");
    std::fs::create_dir_all(&source).expect("Failed to create source tree");
    std::fs::write(
        source.join("demo.h"),
        "// Copyright (c) 2020 Demo Authors\n// MIT License\n#pragma once\n",
    )
    .expect("Failed to write header");

    project.create_file("pkgforge.toml", &demo_recipe(&source));
    source
}

/// Recipe for a local `path` source with one bool and one choice option
#[allow(dead_code)]
pub fn demo_recipe(source: &std::path::Path) -> String {
    format!(
        r#"
[package]
name = "demo"
version = "1.0.0"
description = "Demo library"
license = "MIT"

[source]
path = "{}"
build_indicator = "demo.cc"
primary_header = "demo.h"

[options.with_z]
type = "choice"
choices = ["zlib", "miniz"]
default = "miniz"
define = "DEMO_USE_MINIZ"
define_when = "miniz"
cmake_var = "DEMO_USE_MINIZ"

[options.with_thread]
type = "bool"
default = false
define = "DEMO_USE_THREAD"
min_std = 11
system_libs = ["pthread"]

[[requirements]]
package = "miniz"
version = "=3.0.2"
when = {{ with_z = "miniz" }}

[[requirements]]
package = "zlib"
version = ">=1.2.11, <2"
when = {{ with_z = "zlib" }}

[build]
headers = ["demo.h"]
libs = ["demo"]
"#,
        source.display()
    )
}

/// Register a packaged dependency in the project's local registry
#[allow(dead_code)]
pub fn register_package(project: &TestProject, name: &str, version: &str) {
    let root = format!("packages/{name}/{version}");
    project.create_dir(&format!("{root}/include"));
    project.create_dir(&format!("{root}/lib"));
}

/// Write a fake cmake script that succeeds on every phase and drops a
/// static library into the build directory on `--build`
#[cfg(unix)]
#[allow(dead_code)]
pub fn fake_cmake_success(project: &TestProject, lib_name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--build\" ]; then\n\
           touch \"$2/{lib_name}\"\n\
         fi\n\
         exit 0\n"
    );
    let path = project.path().join("fake-cmake");
    std::fs::write(&path, script).expect("Failed to write fake cmake");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod fake cmake");
    path
}

/// Write a fake cmake script that fails with the given exit code
#[cfg(unix)]
#[allow(dead_code)]
pub fn fake_cmake_failure(project: &TestProject, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script =
        format!("#!/bin/sh\necho \"fatal error: something went wrong\" >&2\nexit {exit_code}\n");
    let path = project.path().join("fake-cmake-fail");
    std::fs::write(&path, script).expect("Failed to write fake cmake");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod fake cmake");
    path
}
