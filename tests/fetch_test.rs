//! Integration tests for source acquisition
//!
//! Serves real tarballs from a local mock HTTP server and runs the full
//! download, verify, and extract path.

mod common;

use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::TestProject;
use pkgforge::core::build_mode::{inspect_tree, BuildMode};
use pkgforge::core::recipe::Recipe;
use pkgforge::error::SourceError;
use pkgforge::infra::download::{DownloadManager, ProgressCallback};
use pkgforge::infra::source;
use sha2::{Digest, Sha256};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a gzipped tarball holding `demo-1.0.0/{demo.h,demo.cc}` and return
/// its bytes
fn make_tarball(dir: &Path) -> Vec<u8> {
    let payload = dir.join("demo-1.0.0");
    std::fs::create_dir_all(&payload).unwrap();
    std::fs::write(payload.join("demo.h"), "// Copyright (c) 2020\n#pragma once\n").unwrap();
    std::fs::write(payload.join("demo.cc"), "#include \"demo.h\"\n").unwrap();

    let archive = dir.join("demo-1.0.0.tar.gz");
    let status = Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(dir)
        .arg("demo-1.0.0")
        .status()
        .expect("tar must be available");
    assert!(status.success());
    std::fs::read(&archive).unwrap()
}

fn url_recipe(url: &str, sha256: &str) -> Recipe {
    Recipe::from_toml(&format!(
        r#"
        [package]
        name = "demo"
        version = "1.0.0"

        [source]
        url = "{url}"
        sha256 = "{sha256}"

        [build]
        headers = ["demo.h"]
        "#
    ))
    .unwrap()
}

#[tokio::test]
async fn test_download_verify_and_extract() {
    let fixtures = TestProject::new();
    let tarball = make_tarball(&fixtures.path());
    let sha256 = hex::encode(Sha256::digest(&tarball));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demo-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball))
        .mount(&server)
        .await;

    let project = TestProject::new();
    let recipe = url_recipe(&format!("{}/demo-1.0.0.tar.gz", server.uri()), &sha256);

    let acquired = source::acquire(
        &recipe,
        &project.path().join("downloads"),
        &project.path().join("sources"),
        false,
        None,
    )
    .await
    .expect("acquisition must succeed");

    assert!(!acquired.download_skipped);
    // strip_root defaults to true, so the header lands directly in the root
    assert!(acquired.root.join("demo.h").is_file());
    assert!(project.file_exists("downloads/demo-1.0.0.tar.gz"));
}

#[tokio::test]
async fn test_cached_archive_skips_download() {
    let fixtures = TestProject::new();
    let tarball = make_tarball(&fixtures.path());
    let sha256 = hex::encode(Sha256::digest(&tarball));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demo-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball))
        .expect(1)
        .mount(&server)
        .await;

    let project = TestProject::new();
    let recipe = url_recipe(&format!("{}/demo-1.0.0.tar.gz", server.uri()), &sha256);
    let downloads = project.path().join("downloads");
    let sources = project.path().join("sources");

    let first = source::acquire(&recipe, &downloads, &sources, false, None)
        .await
        .expect("first acquisition");
    assert!(!first.download_skipped);

    // The checksum-valid cached archive satisfies the second run
    let second = source::acquire(&recipe, &downloads, &sources, false, None)
        .await
        .expect("second acquisition");
    assert!(second.download_skipped);
    assert_eq!(first.root, second.root);
}

#[tokio::test]
async fn test_checksum_mismatch_rejects_and_deletes() {
    let fixtures = TestProject::new();
    let tarball = make_tarball(&fixtures.path());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demo-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball))
        .mount(&server)
        .await;

    let project = TestProject::new();
    let recipe = url_recipe(
        &format!("{}/demo-1.0.0.tar.gz", server.uri()),
        &"0".repeat(64),
    );

    let err = source::acquire(
        &recipe,
        &project.path().join("downloads"),
        &project.path().join("sources"),
        false,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SourceError::ChecksumMismatch { .. }));
    // The corrupt archive must not survive to poison the next run
    assert!(!project.file_exists("downloads/demo-1.0.0.tar.gz"));
    assert!(!project.file_exists("sources/demo-1.0.0"));
}

#[tokio::test]
async fn test_interrupted_extraction_is_not_reused() {
    let fixtures = TestProject::new();
    let tarball = make_tarball(&fixtures.path());
    let sha256 = hex::encode(Sha256::digest(&tarball));

    // Checksum-valid cached archive, so no server is needed
    let project = TestProject::new();
    project.create_dir("downloads");
    std::fs::write(project.path().join("downloads/demo-1.0.0.tar.gz"), &tarball).unwrap();

    // Leftover from a run whose tar was terminated partway through
    project.create_file("sources/demo-1.0.0.extracting/demo.h", "// truncated\n");

    let recipe = url_recipe("https://example.invalid/demo-1.0.0.tar.gz", &sha256);
    let acquired = source::acquire(
        &recipe,
        &project.path().join("downloads"),
        &project.path().join("sources"),
        false,
        None,
    )
    .await
    .expect("acquisition must succeed");

    assert!(acquired.download_skipped);
    // The stale partial tree was discarded and the full archive unpacked
    assert!(acquired.root.join("demo.h").is_file());
    assert!(acquired.root.join("demo.cc").is_file());
    assert!(!project.path().join("sources/demo-1.0.0.extracting").exists());
    assert_eq!(
        inspect_tree(&acquired.root, Some("demo.cc")).unwrap(),
        BuildMode::Compiled
    );
}

#[tokio::test]
async fn test_download_reports_progress() {
    let fixtures = TestProject::new();
    let tarball = make_tarball(&fixtures.path());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demo-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tarball.clone()))
        .mount(&server)
        .await;

    let project = TestProject::new();
    let seen = Arc::new(AtomicU64::new(0));
    let progress: ProgressCallback = {
        let seen = Arc::clone(&seen);
        Box::new(move |downloaded, _total| {
            seen.store(downloaded, Ordering::SeqCst);
        })
    };

    let result = DownloadManager::new()
        .download(
            &format!("{}/demo-1.0.0.tar.gz", server.uri()),
            &project.path().join("downloads/demo-1.0.0.tar.gz"),
            Some(progress),
        )
        .await
        .expect("download must succeed");

    assert_eq!(result.size, tarball.len() as u64);
    assert_eq!(seen.load(Ordering::SeqCst), result.size);
}

#[tokio::test]
async fn test_http_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/demo-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let project = TestProject::new();
    let recipe = url_recipe(
        &format!("{}/demo-1.0.0.tar.gz", server.uri()),
        &"0".repeat(64),
    );

    let err = source::acquire(
        &recipe,
        &project.path().join("downloads"),
        &project.path().join("sources"),
        false,
        None,
    )
    .await
    .unwrap_err();

    match err {
        SourceError::SourceFetchError { url, error } => {
            assert!(url.contains("demo-1.0.0.tar.gz"));
            assert!(error.contains("404"), "error should carry the status: {error}");
        }
        other => panic!("Expected SourceFetchError, got {other}"),
    }
}
