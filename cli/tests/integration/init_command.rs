//! Integration tests for `convoy init`.
//!
//! Registry and download traffic is served by a minimal in-test HTTP
//! fixture server; the base-URL environment variables point the spawned
//! binary at it, so no test ever reaches a real registry.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::{Read, Write};
use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn convoy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("convoy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Serve `responses` in order, one per accepted connection, on an ephemeral
/// port. The listener is bound before this returns, so the port is live.
fn serve_on(listener: TcpListener, responses: Vec<Vec<u8>>) {
    std::thread::spawn(move || {
        for resp in responses {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(&resp);
            }
        }
    });
}

fn http_200(body: &[u8]) -> Vec<u8> {
    let mut r = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    r.extend_from_slice(body);
    r
}

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        for (name, content) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn test_init_unresolvable_source_fails_naming_the_spec() {
    let dir = TempDir::new().unwrap();
    // Port 1 refuses connections: every registry lookup is a silent miss.
    convoy()
        .args(["init", "org/ghost", "--target"])
        .arg(dir.path())
        .env("CONVOY_HUB_API_URL", "http://127.0.0.1:1")
        .env("CONVOY_GITHUB_API_URL", "http://127.0.0.1:1")
        .env("CONVOY_CONFIG", dir.path().join("config.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No application found for 'org/ghost'"));
}

#[test]
fn test_init_malformed_parameters_payload_fails_before_any_lookup() {
    let dir = TempDir::new().unwrap();
    convoy()
        .args(["init", "org/app", "--parameters", "{not json"])
        .env("CONVOY_HUB_API_URL", "http://127.0.0.1:1")
        .env("CONVOY_GITHUB_API_URL", "http://127.0.0.1:1")
        .env("CONVOY_CONFIG", dir.path().join("config.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parameters is not a valid JSON object"));
}

#[test]
fn test_init_non_object_parameters_payload_fails() {
    let dir = TempDir::new().unwrap();
    convoy()
        .args(["init", "org/app", "--parameters", "[1,2]"])
        .env("CONVOY_CONFIG", dir.path().join("config.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));
}

// ---------------------------------------------------------------------------
// End-to-end acquisition against the fixture hub
// ---------------------------------------------------------------------------

#[test]
fn test_init_downloads_and_materializes_a_hub_release() {
    let target = TempDir::new().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let archive = zip_bytes(&[
        ("webapp-main/convoy.yaml", "services:\n  api:\n    image: api:v1\n"),
        ("webapp-main/README.md", "# webapp\n"),
    ]);
    let release = format!(
        r#"{{"tag_name":"v1","zipball_url":"http://127.0.0.1:{port}/zipball/v1"}}"#
    );
    // Connection order: release lookup, HEAD probe, archive download.
    serve_on(
        listener,
        vec![
            http_200(release.as_bytes()),
            http_200(&archive),
            http_200(&archive),
        ],
    );

    convoy()
        .args(["init", "acme/webapp", "--registry", "hub", "--target"])
        .arg(target.path())
        .arg("-y")
        .env("CONVOY_HUB_API_URL", format!("http://127.0.0.1:{port}"))
        .env("CONVOY_CONFIG", target.path().join("config.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Project ready"));

    let app = target.path().join("webapp");
    assert!(app.join("convoy.yaml").exists());
    assert!(app.join("README.md").exists());
    // The wrapping root folder was stripped and the archive removed.
    assert!(!app.join("webapp-main").exists());
    // The timestamp-suffixed temporary sibling is gone.
    let entries: Vec<String> = std::fs::read_dir(target.path())
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.file_name().to_string_lossy().into_owned()))
        .filter(|n| n.starts_with("webapp"))
        .collect();
    assert_eq!(entries, vec!["webapp".to_string()]);
}

#[test]
fn test_init_name_override_places_project_under_that_name() {
    let target = TempDir::new().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let archive = zip_bytes(&[("webapp-main/convoy.yaml", "services: {}\n")]);
    let release = format!(
        r#"{{"tag_name":"v1","zipball_url":"http://127.0.0.1:{port}/zipball/v1"}}"#
    );
    serve_on(
        listener,
        vec![
            http_200(release.as_bytes()),
            http_200(&archive),
            http_200(&archive),
        ],
    );

    convoy()
        .args(["init", "acme/webapp", "--registry", "hub", "--name", "my-app", "--target"])
        .arg(target.path())
        .arg("-y")
        .env("CONVOY_HUB_API_URL", format!("http://127.0.0.1:{port}"))
        .env("CONVOY_CONFIG", target.path().join("config.yaml"))
        .assert()
        .success();

    assert!(target.path().join("my-app").join("convoy.yaml").exists());
    assert!(!target.path().join("webapp").exists());
}
