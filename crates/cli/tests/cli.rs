// ABOUTME: End-to-end tests for the ue-migrate binary surface.
// ABOUTME: Covers help output, upload preflight, and the offline seed stage.

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::cargo_bin("ue-migrate").unwrap()
}

#[test]
fn help_lists_every_stage() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("scrape")
                .and(predicate::str::contains("harvest"))
                .and(predicate::str::contains("import"))
                .and(predicate::str::contains("seed"))
                .and(predicate::str::contains("upload")),
        );
}

#[test]
fn upload_without_credentials_fails_before_any_network() {
    bin()
        .arg("upload")
        .env_remove("SANITY_PROJECT_ID")
        .env_remove("SANITY_API_TOKEN")
        .env_remove("SANITY_DATASET")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("SANITY_PROJECT_ID")
                .and(predicate::str::contains("SANITY_API_TOKEN")),
        );
}

#[test]
fn seed_writes_import_file_and_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let import_dir = dir.path().join("sanity-import");

    bin()
        .arg("seed")
        .env("MIGRATE_OUTPUT_DIR", &import_dir)
        .env("MIGRATE_MEDIA_DIR", dir.path().join("scraped-media"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed complete"));

    let ndjson = std::fs::read_to_string(import_dir.join("sanity-import.ndjson")).unwrap();
    assert_eq!(ndjson.lines().count(), 23);
    assert!(import_dir.join("image-mapping.json").exists());
}

#[test]
fn unknown_subcommand_is_rejected() {
    bin()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
