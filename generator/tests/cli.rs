use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;
use wichtel_core::{AssignmentsData, INVALID_LINK_MESSAGE, UNAVAILABLE_MESSAGE};

const ROSTER: &str = r#"[
    { "name": "Alice", "contact": "alice@example.com", "contactType": "email", "id": "g1" },
    { "name": "Bob", "contact": null, "contactType": "whatsapp", "id": "g2" },
    { "name": "Carol", "contactType": "email", "id": "g3" }
]"#;

fn wichtel(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wichtel"));
    cmd.current_dir(dir)
        .env_remove("WICHTEL_INPUT")
        .env_remove("WICHTEL_OUTPUT")
        .env_remove("WICHTEL_BASE_URL")
        .env_remove("WICHTEL_ASSIGNMENTS")
        .env_remove("WICHTEL_LOG");
    cmd
}

fn read_assignments(path: &Path) -> AssignmentsData {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn default_paths_generate_assignments() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wichtel.json"), ROSTER).unwrap();

    wichtel(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading wichtel.json..."))
        .stdout(predicate::str::contains("Found 3 participants:"))
        .stdout(predicate::str::contains("✓ Assignments written to assignments.json"))
        .stdout(predicate::str::contains("✓ Generation complete!"));

    let data = read_assignments(&dir.path().join("assignments.json"));
    assert_eq!(data.assignments.len(), 3);
    assert!(data.tokens_are_unique());
    assert!(data
        .assignments
        .iter()
        .all(|a| a.giver_name != a.receiver_name));
}

#[test]
fn explicit_paths_and_env_fallbacks() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("people.json"), ROSTER).unwrap();

    wichtel(dir.path())
        .args(["people.json", "out.json"])
        .assert()
        .success();
    assert_eq!(read_assignments(&dir.path().join("out.json")).assignments.len(), 3);

    wichtel(dir.path())
        .env("WICHTEL_INPUT", "people.json")
        .env("WICHTEL_OUTPUT", "from-env.json")
        .assert()
        .success();
    assert!(dir.path().join("from-env.json").exists());
}

#[test]
fn missing_input_prints_usage_and_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    wichtel(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: wichtel.json not found."))
        .stdout(predicate::str::contains("Usage: wichtel"))
        .stderr("");

    assert!(!dir.path().join("assignments.json").exists());
}

#[test]
fn single_participant_fails_without_output() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("wichtel.json"),
        r#"[{ "name": "Alice", "contactType": "email", "id": "g1" }]"#,
    )
    .unwrap();

    wichtel(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr("Error: need at least 2 participants, got 1\n");

    assert!(!dir.path().join("assignments.json").exists());
}

#[test]
fn invalid_roster_keeps_existing_assignments() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wichtel.json"), "[]").unwrap();
    fs::write(dir.path().join("assignments.json"), "previous").unwrap();

    wichtel(dir.path()).assert().failure().code(1);

    assert_eq!(
        fs::read_to_string(dir.path().join("assignments.json")).unwrap(),
        "previous"
    );
}

#[test]
fn help_points_to_show_pairs() {
    let dir = TempDir::new().unwrap();

    wichtel(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer printed by default"));
}

#[test]
fn malformed_input_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wichtel.json"), "{ not json").unwrap();

    wichtel(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed JSON in wichtel.json"));
}

#[test]
fn reveal_round_trip_through_generated_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wichtel.json"), ROSTER).unwrap();
    wichtel(dir.path())
        .args(["--base-url", "https://wichtel.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://wichtel.example/wichtel/"));

    let data = read_assignments(&dir.path().join("assignments.json"));
    for a in &data.assignments {
        wichtel(dir.path())
            .args(["reveal", &format!("https://wichtel.example/wichtel/{}", a.token)])
            .assert()
            .success()
            .stdout(format!("You are the Wichtel for: {}\n", a.receiver_name));
    }

    wichtel(dir.path())
        .args(["reveal", &uuid::Uuid::new_v4().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(INVALID_LINK_MESSAGE));
}

#[test]
fn reveal_without_assignments_file_asks_to_retry() {
    let dir = TempDir::new().unwrap();

    wichtel(dir.path())
        .args(["reveal", "T1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(UNAVAILABLE_MESSAGE));
}

#[test]
fn seeded_pairing_is_reproducible() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("wichtel.json"), ROSTER).unwrap();

    wichtel(dir.path())
        .args(["wichtel.json", "a.json", "--seed", "2025"])
        .assert()
        .success();
    wichtel(dir.path())
        .args(["wichtel.json", "b.json", "--seed", "2025"])
        .assert()
        .success();

    let a = read_assignments(&dir.path().join("a.json"));
    let b = read_assignments(&dir.path().join("b.json"));
    for (x, y) in a.assignments.iter().zip(&b.assignments) {
        assert_eq!(x.receiver_name, y.receiver_name);
        assert_ne!(x.token, y.token);
    }
}
