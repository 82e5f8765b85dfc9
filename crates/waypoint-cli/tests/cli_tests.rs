use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCHEMA_ID: &str = "0b5cbb0e-4a4c-4b8e-9b8e-1d2f3a4b5c6d";
const API_ID: &str = "7f1e2d3c-5b6a-4c7d-8e9f-0a1b2c3d4e5f";

/// Helper function to create a temporary data directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command bound to `dir` with plain output
fn wp_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wp").expect("Failed to find wp binary");
    cmd.env_remove("DATA_DIR")
        .arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path());
    cmd
}

/// Writes a document with two tasks where "Build API" depends on "Add schema".
fn seed_tasks(dir: &TempDir) {
    let document = serde_json::json!({
        "tasks": [
            {
                "id": SCHEMA_ID,
                "name": "Add schema",
                "description": "Create the tables",
                "status": "pending",
                "dependencies": [],
                "createdAt": "2025-01-01T10:00:00Z",
                "updatedAt": "2025-01-01T10:00:00Z"
            },
            {
                "id": API_ID,
                "name": "Build API",
                "description": "Expose the endpoints",
                "status": "pending",
                "dependencies": [{"taskId": SCHEMA_ID}],
                "createdAt": "2025-01-01T10:01:00Z",
                "updatedAt": "2025-01-01T10:01:00Z"
            }
        ]
    });
    fs::write(
        dir.path().join("tasks.json"),
        serde_json::to_string_pretty(&document).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_cli_list_empty_tasks() {
    let temp_dir = create_cli_test_environment();

    wp_cmd(&temp_dir)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    assert!(temp_dir.path().join("tasks.json").exists());
}

#[test]
fn test_cli_no_command_lists_tasks() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("## ○ Pending (2)"))
        .stdout(predicate::str::contains("Add schema"))
        .stdout(predicate::str::contains("Build API"));
}

#[test]
fn test_cli_add_task() {
    let temp_dir = create_cli_test_environment();

    wp_cmd(&temp_dir)
        .args([
            "task",
            "add",
            "Write docs",
            "--description",
            "Document the endpoints",
            "--notes",
            "Keep it short",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task with ID:"))
        .stdout(predicate::str::contains("Write docs"))
        .stdout(predicate::str::contains("Document the endpoints"));

    let text = fs::read_to_string(temp_dir.path().join("tasks.json")).unwrap();
    assert!(text.contains("\"name\": \"Write docs\""));
    assert!(text.contains("\"notes\": \"Keep it short\""));
}

#[test]
fn test_cli_split_from_file() {
    let temp_dir = create_cli_test_environment();
    let batch = temp_dir.path().join("batch.json");
    fs::write(
        &batch,
        r#"{
            "globalAnalysisResult": "Ship the login flow",
            "tasks": [
                {"name": "Form", "description": "Render the login form"},
                {"name": "Session", "description": "Store the session", "dependencies": ["Form"]}
            ]
        }"#,
    )
    .unwrap();

    wp_cmd(&temp_dir)
        .args(["split", batch.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 new tasks."))
        .stdout(predicate::str::contains("Depends on: \"Form\""))
        .stdout(predicate::str::contains("Total tasks in store: 2"));

    let text = fs::read_to_string(temp_dir.path().join("tasks.json")).unwrap();
    assert!(text.contains("Ship the login flow"));
}

#[test]
fn test_cli_split_from_stdin_rejects_duplicate_names() {
    let temp_dir = create_cli_test_environment();

    wp_cmd(&temp_dir)
        .args(["split", "-"])
        .write_stdin(r#"[{"name": "A", "description": "a"}, {"name": "A", "description": "b"}]"#)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("Duplicate task name 'A'"));

    wp_cmd(&temp_dir)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_cli_split_invalid_json_fails() {
    let temp_dir = create_cli_test_environment();

    wp_cmd(&temp_dir)
        .args(["split", "-"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid batch"));
}

#[test]
fn test_cli_execute_blocked_then_lifecycle() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["task", "execute", API_ID])
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot start yet"))
        .stdout(predicate::str::contains(SCHEMA_ID));

    wp_cmd(&temp_dir)
        .args(["task", "execute", SCHEMA_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Executing task"))
        .stdout(predicate::str::contains("### Complexity:"));

    wp_cmd(&temp_dir)
        .args([
            "task",
            "verify",
            SCHEMA_ID,
            "--score",
            "60",
            "--summary",
            "Missing indexes",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("scored 60, below 80"))
        .stdout(predicate::str::contains("Missing indexes"));

    wp_cmd(&temp_dir)
        .args([
            "task",
            "verify",
            SCHEMA_ID,
            "--score",
            "92",
            "--summary",
            "Tables and indexes created",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed verification with score 92"));

    wp_cmd(&temp_dir)
        .args(["task", "execute", API_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("### Completed Dependencies"))
        .stdout(predicate::str::contains("Tables and indexes created"));
}

#[test]
fn test_cli_verify_requires_in_progress() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["task", "verify", SCHEMA_ID, "--score", "95", "--summary", "done"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("only tasks in progress can be verified"));
}

#[test]
fn test_cli_delete_refuses_task_with_dependents() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["task", "delete", SCHEMA_ID])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("Build API"));

    wp_cmd(&temp_dir)
        .args(["task", "delete", API_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task \"Build API\""));

    wp_cmd(&temp_dir)
        .args(["task", "delete", SCHEMA_ID])
        .assert()
        .success();
}

#[test]
fn test_cli_unknown_task_fails() {
    let temp_dir = create_cli_test_environment();

    wp_cmd(&temp_dir)
        .args(["task", "show", "missing-id"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: Task with ID missing-id not found"));
}

#[test]
fn test_cli_update_task() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args([
            "task",
            "update",
            API_ID,
            "--description",
            "Expose the REST endpoints",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task with ID:"))
        .stdout(predicate::str::contains("Expose the REST endpoints"));
}

#[test]
fn test_cli_check_reports_blockers() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["task", "check", SCHEMA_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("Executable: yes"))
        .stdout(predicate::str::contains("Deletable: no, required by"));

    wp_cmd(&temp_dir)
        .args(["task", "check", API_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("Executable: no, blocked by"))
        .stdout(predicate::str::contains("Deletable: yes"));
}

#[test]
fn test_cli_clear_requires_confirm_and_archives() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["clear"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error:"));

    wp_cmd(&temp_dir)
        .args(["task", "status", SCHEMA_ID, "completed"])
        .assert()
        .success();

    wp_cmd(&temp_dir)
        .args(["clear", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 tasks"));

    let archives: Vec<_> = fs::read_dir(temp_dir.path().join("memory"))
        .unwrap()
        .collect();
    assert_eq!(archives.len(), 1);

    wp_cmd(&temp_dir)
        .args(["task", "detail", SCHEMA_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add schema"));

    wp_cmd(&temp_dir)
        .args(["task", "query", "schema tables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 tasks"));
}

#[test]
fn test_cli_complexity() {
    let temp_dir = create_cli_test_environment();
    seed_tasks(&temp_dir);

    wp_cmd(&temp_dir)
        .args(["task", "complexity", API_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Build API"))
        .stdout(predicate::str::contains("### Complexity:"))
        .stdout(predicate::str::contains("- Dependencies: 1"));
}

#[test]
fn test_cli_relative_data_dir_uses_workspace_root() {
    let temp_dir = create_cli_test_environment();

    Command::cargo_bin("wp")
        .unwrap()
        .env_remove("DATA_DIR")
        .args(["--no-color", "--workspace-root"])
        .arg(temp_dir.path())
        .args(["--data-dir", "state", "task", "list"])
        .assert()
        .success();

    assert!(temp_dir.path().join("state").join("tasks.json").exists());
}
